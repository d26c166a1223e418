//! # Constitution Store Module
//!
//! ## Purpose
//! The query operations exposed to the HTTP layer. Owns the source document
//! path and the index cache; per request it resolves the document's current
//! mtime, obtains the matching snapshot (building it on a miss) and runs the
//! filter/sort/paginate pipeline over the requested collection.
//!
//! ## Input/Output Specification
//! - **Input**: Caller-supplied identifiers (Arabic or Roman), query/sort/page
//!   parameters
//! - **Output**: `Arc`-shared records, `Paginacion` envelopes, or domain
//!   NotFound errors
//! - **I/O**: One `stat` per request; one document read per cache miss
//!
//! ## Key Features
//! - Dual-mode Title identifier resolution
//! - Read-only and side-effect-free per request
//! - Document I/O failures propagate as hard errors, never retried here

use crate::cache::IndexCache;
use crate::config::{CacheConfig, DocumentConfig, PaginationConfig};
use crate::document::{Articulo, Capitulo, Paginacion, Titulo};
use crate::errors::{ConstitucionError, Result};
use crate::index::{build_index, IndexSnapshot};
use crate::query::{filter, paginate, sort_items, PageParams, Queryable, SortOrder};
use crate::roman;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Listing parameters shared by every collection endpoint.
#[derive(Debug, Clone, Default)]
pub struct ConsultaParams {
    /// Substring search query
    pub q: Option<String>,
    /// Sort key name, kind-specific, defaults to `numero`
    pub ordenar_por: Option<String>,
    /// Sort direction, `desc` or anything-else-meaning-ascending
    pub orden: Option<String>,
    /// 1-based page number
    pub pagina: Option<i64>,
    /// Items per page
    pub tamano_pagina: Option<i64>,
}

/// Read-only facade over the constitution document.
pub struct ConstitucionStore {
    path: PathBuf,
    cache: IndexCache,
    pagination: PaginationConfig,
}

impl ConstitucionStore {
    pub fn new(
        document: &DocumentConfig,
        cache: &CacheConfig,
        pagination: &PaginationConfig,
    ) -> Self {
        Self {
            path: document.path.clone(),
            cache: IndexCache::new(cache.max_snapshots),
            pagination: pagination.clone(),
        }
    }

    /// Obtain the snapshot for the document's current mtime.
    fn snapshot(&self) -> Result<Arc<IndexSnapshot>> {
        let mtime = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| ConstitucionError::DocumentRead {
                path: self.path.display().to_string(),
                source: e,
            })?;

        self.cache.get_or_build(mtime, || self.load())
    }

    /// Read and parse the source document, then build a fresh index.
    fn load(&self) -> Result<IndexSnapshot> {
        tracing::info!(path = %self.path.display(), "rebuilding index snapshot");

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| ConstitucionError::DocumentRead {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let raw: Value =
            serde_json::from_str(&content).map_err(|e| ConstitucionError::DocumentParse {
                path: self.path.display().to_string(),
                details: e.to_string(),
            })?;

        Ok(build_index(Arc::new(raw)))
    }

    /// Run the fixed filter → sort → paginate pipeline over a collection.
    fn listing<T: Queryable + Serialize>(
        &self,
        items: Vec<Arc<T>>,
        params: &ConsultaParams,
    ) -> Paginacion<Arc<T>> {
        let filtered = filter(items, params.q.as_deref());
        let sorted = sort_items(
            filtered,
            params.ordenar_por.as_deref(),
            SortOrder::from_param(params.orden.as_deref()),
        );
        let page = PageParams {
            pagina: params.pagina.unwrap_or(1),
            tamano_pagina: params
                .tamano_pagina
                .unwrap_or(self.pagination.default_page_size),
        }
        .clamped(self.pagination.max_page_size);
        let (items, total) = paginate(sorted, page);

        Paginacion {
            total,
            pagina: page.pagina,
            tamano_pagina: page.tamano_pagina,
            items,
        }
    }

    /// Verbatim passthrough of the raw source tree.
    pub fn raw_document(&self) -> Result<Arc<Value>> {
        Ok(self.snapshot()?.raw.clone())
    }

    /// List Titles with search, sort and pagination.
    pub fn list_titulos(&self, params: &ConsultaParams) -> Result<Paginacion<Arc<Titulo>>> {
        let idx = self.snapshot()?;
        let items = idx.titulos.values().cloned().collect();
        Ok(self.listing(items, params))
    }

    /// Look up one Title by Arabic or Roman identifier.
    pub fn get_titulo(&self, identifier: &str) -> Result<Arc<Titulo>> {
        let idx = self.snapshot()?;
        let numero = roman::resolve_title_number(identifier);
        idx.titulos_por_num
            .get(&numero)
            .cloned()
            .ok_or_else(|| ConstitucionError::TituloNotFound {
                identifier: identifier.to_string(),
            })
    }

    /// List all Chapters, optionally restricted to one Title.
    pub fn list_capitulos(
        &self,
        titulo: Option<&str>,
        params: &ConsultaParams,
    ) -> Result<Paginacion<Arc<Capitulo>>> {
        let idx = self.snapshot()?;
        let mut items: Vec<Arc<Capitulo>> = idx.capitulos.values().cloned().collect();
        if let Some(identifier) = titulo {
            let numero = roman::resolve_title_number(identifier);
            items.retain(|c| c.titulo_num == numero);
        }
        Ok(self.listing(items, params))
    }

    /// List the Chapters of one Title; NotFound when the Title is missing.
    pub fn list_capitulos_de_titulo(
        &self,
        identifier: &str,
        params: &ConsultaParams,
    ) -> Result<Paginacion<Arc<Capitulo>>> {
        let titulo = self.get_titulo(identifier)?;
        Ok(self.listing(titulo.capitulos.clone(), params))
    }

    /// Look up one Chapter within a Title.
    pub fn get_capitulo(&self, identifier: &str, capitulo_num: u32) -> Result<Arc<Capitulo>> {
        let idx = self.snapshot()?;
        let titulo_num = roman::resolve_title_number(identifier);
        idx.capitulos
            .get(&(titulo_num, capitulo_num))
            .cloned()
            .ok_or(ConstitucionError::CapituloNotFound {
                titulo_num,
                capitulo_num,
            })
    }

    /// List Articles with search, sort and pagination.
    pub fn list_articulos(&self, params: &ConsultaParams) -> Result<Paginacion<Arc<Articulo>>> {
        let idx = self.snapshot()?;
        let items = idx.articulos.values().cloned().collect();
        Ok(self.listing(items, params))
    }

    /// Look up one Article by its global number.
    pub fn get_articulo(&self, numero: u32) -> Result<Arc<Articulo>> {
        let idx = self.snapshot()?;
        idx.articulos
            .get(&numero)
            .cloned()
            .ok_or(ConstitucionError::ArticuloNotFound { numero })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> Value {
        json!({
            "TITULO I - El Estado Panameño": {
                "articulo-1": "La Nación panameña está organizada en Estado soberano e independiente.",
                "articulo-2": "El Poder Público sólo emana del pueblo."
            },
            "TITULO III - Derechos y Deberes": {
                "Capitulos": {
                    "Capitulo 1 - Garantías Fundamentales": {
                        "articulo-17": "Las autoridades de la República protegen la vida, honra y bienes.",
                        "articulo-109": "Es función esencial del Estado velar por la salud de la población."
                    },
                    "Capitulo 2 - La Familia": {
                        "articulo-107": "Se reconoce la libertad de los actos de cultos religiosos."
                    }
                }
            }
        })
    }

    fn store() -> (ConstitucionStore, NamedTempFile) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(sample_json().to_string().as_bytes()).unwrap();
        file.flush().unwrap();
        let store = ConstitucionStore::new(
            &DocumentConfig {
                path: file.path().to_path_buf(),
            },
            &CacheConfig { max_snapshots: 8 },
            &PaginationConfig {
                default_page_size: 20,
                max_page_size: 200,
            },
        );
        (store, file)
    }

    #[test]
    fn test_arabic_and_roman_identifiers_resolve_to_same_titulo() {
        let (store, _file) = store();
        let by_roman = store.get_titulo("III").unwrap();
        let by_arabic = store.get_titulo("3").unwrap();
        assert!(Arc::ptr_eq(&by_roman, &by_arabic));
        assert_eq!(by_roman.numero, 3);
    }

    #[test]
    fn test_unknown_titulo_is_not_found() {
        let (store, _file) = store();
        let err = store.get_titulo("XL").unwrap_err();
        assert!(err.is_not_found());
        let err = store.get_titulo("garbanzo").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get_articulo_spec_example() {
        let (store, _file) = store();
        let articulo = store.get_articulo(107).unwrap();
        assert_eq!(articulo.numero, 107);
        assert_eq!(articulo.titulo_num, 3);
        assert_eq!(articulo.capitulo_num, Some(2));
        assert!(articulo.texto.contains("actos de cultos religiosos"));

        assert!(store.get_articulo(9999).unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_capitulo_is_not_found_not_empty() {
        let (store, _file) = store();
        let err = store.get_capitulo("3", 99).unwrap_err();
        assert!(matches!(
            err,
            ConstitucionError::CapituloNotFound {
                titulo_num: 3,
                capitulo_num: 99
            }
        ));
    }

    #[test]
    fn test_list_articulos_search_and_page_size() {
        let (store, _file) = store();
        let page = store
            .list_articulos(&ConsultaParams {
                q: Some("salud".to_string()),
                tamano_pagina: Some(5),
                ..Default::default()
            })
            .unwrap();
        assert!(page.items.len() <= 5);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].numero, 109);
    }

    #[test]
    fn test_list_capitulos_with_titulo_filter() {
        let (store, _file) = store();
        let all = store
            .list_capitulos(None, &ConsultaParams::default())
            .unwrap();
        assert_eq!(all.total, 2);

        let filtered = store
            .list_capitulos(Some("III"), &ConsultaParams::default())
            .unwrap();
        assert_eq!(filtered.total, 2);

        let none = store
            .list_capitulos(Some("9"), &ConsultaParams::default())
            .unwrap();
        assert_eq!(none.total, 0);
    }

    #[test]
    fn test_list_capitulos_de_titulo_requires_existing_titulo() {
        let (store, _file) = store();
        let page = store
            .list_capitulos_de_titulo("III", &ConsultaParams::default())
            .unwrap();
        assert_eq!(page.total, 2);

        let err = store
            .list_capitulos_de_titulo("IX", &ConsultaParams::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_titulos_sorted_desc() {
        let (store, _file) = store();
        let page = store
            .list_titulos(&ConsultaParams {
                orden: Some("desc".to_string()),
                ..Default::default()
            })
            .unwrap();
        let numeros: Vec<u32> = page.items.iter().map(|t| t.numero).collect();
        assert_eq!(numeros, vec![3, 1]);
    }

    #[test]
    fn test_snapshot_reused_for_unchanged_document() {
        let (store, _file) = store();
        let first = store.raw_document().unwrap();
        let second = store.raw_document().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_document_is_hard_error() {
        let store = ConstitucionStore::new(
            &DocumentConfig {
                path: PathBuf::from("/no/such/document.json"),
            },
            &CacheConfig { max_snapshots: 8 },
            &PaginationConfig {
                default_page_size: 20,
                max_page_size: 200,
            },
        );
        let err = store.raw_document().unwrap_err();
        assert!(matches!(err, ConstitucionError::DocumentRead { .. }));
        assert!(!err.is_not_found());
    }
}
