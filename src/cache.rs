//! # Index Cache Module
//!
//! ## Purpose
//! Memoizes built index snapshots keyed on the source document's
//! last-modified timestamp, so the document is re-parsed only when it
//! actually changes.
//!
//! ## Input/Output Specification
//! - **Input**: Source mtime plus a loader closure supplied by the store
//! - **Output**: `Arc<IndexSnapshot>` — cached or freshly built
//! - **Bounds**: Small fixed capacity with least-recently-used eviction;
//!   eviction is a performance detail, callers must not assume any entry
//!   survives
//!
//! ## Key Features
//! - Mutex-guarded lookup-or-build, safe under concurrent readers
//! - No I/O of its own; the timestamp and loader come from the caller
//! - Identical timestamp returns the identical snapshot allocation

use crate::errors::Result;
use crate::index::IndexSnapshot;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::SystemTime;

/// Bounded LRU cache of index snapshots keyed by source mtime.
pub struct IndexCache {
    max_snapshots: usize,
    // Front = most recently used. The capacity is single digits, so a
    // linear scan beats any fancier structure.
    entries: Mutex<Vec<(SystemTime, Arc<IndexSnapshot>)>>,
}

impl IndexCache {
    /// Create a cache holding at most `max_snapshots` entries.
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            max_snapshots: max_snapshots.max(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Return the snapshot for `mtime`, building it with `build` on a miss.
    ///
    /// A changed mtime triggers a full rebuild; a failing build caches
    /// nothing and propagates the error to the caller.
    pub fn get_or_build<F>(&self, mtime: SystemTime, build: F) -> Result<Arc<IndexSnapshot>>
    where
        F: FnOnce() -> Result<IndexSnapshot>,
    {
        let mut entries = self.entries.lock();

        if let Some(pos) = entries.iter().position(|(key, _)| *key == mtime) {
            let entry = entries.remove(pos);
            let snapshot = entry.1.clone();
            entries.insert(0, entry);
            return Ok(snapshot);
        }

        let snapshot = Arc::new(build()?);
        entries.insert(0, (mtime, snapshot.clone()));
        entries.truncate(self.max_snapshots);

        Ok(snapshot)
    }

    /// Number of snapshots currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when no snapshot has been built yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConstitucionError;
    use crate::index::build_index;
    use serde_json::json;
    use std::time::Duration;

    fn snapshot() -> IndexSnapshot {
        build_index(Arc::new(json!({ "TITULO I": { "articulo-1": "texto" } })))
    }

    fn mtime(offset_secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs)
    }

    #[test]
    fn test_same_mtime_returns_same_snapshot() {
        let cache = IndexCache::new(8);
        let first = cache.get_or_build(mtime(0), || Ok(snapshot())).unwrap();
        let second = cache
            .get_or_build(mtime(0), || panic!("must not rebuild"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_mtime_rebuilds() {
        let cache = IndexCache::new(8);
        let first = cache.get_or_build(mtime(0), || Ok(snapshot())).unwrap();
        let second = cache.get_or_build(mtime(1), || Ok(snapshot())).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_oldest_used_entry_evicted() {
        let cache = IndexCache::new(2);
        cache.get_or_build(mtime(0), || Ok(snapshot())).unwrap();
        cache.get_or_build(mtime(1), || Ok(snapshot())).unwrap();
        // Touch the first entry so the second becomes least recently used.
        cache
            .get_or_build(mtime(0), || panic!("must not rebuild"))
            .unwrap();
        cache.get_or_build(mtime(2), || Ok(snapshot())).unwrap();

        assert_eq!(cache.len(), 2);
        let mut rebuilt = false;
        cache
            .get_or_build(mtime(1), || {
                rebuilt = true;
                Ok(snapshot())
            })
            .unwrap();
        assert!(rebuilt);
    }

    #[test]
    fn test_failed_build_caches_nothing() {
        let cache = IndexCache::new(8);
        let result = cache.get_or_build(mtime(0), || {
            Err(ConstitucionError::Internal {
                message: "boom".to_string(),
            })
        });
        assert!(result.is_err());
        assert!(cache.is_empty());

        let recovered = cache.get_or_build(mtime(0), || Ok(snapshot()));
        assert!(recovered.is_ok());
    }
}
