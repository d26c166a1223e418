//! # Constitución de Panamá Query API
//!
//! ## Overview
//! This library serves the Constitution of Panama — a hierarchically
//! structured legal document of Títulos, Capítulos and Artículos — as a
//! read-mostly REST API with substring search, configurable sorting and
//! bounds-clamped pagination.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `roman`: Roman numeral codec and label parsing
//! - `document`: typed records and the source-shape union
//! - `index`: document parser and index builder
//! - `cache`: mtime-keyed memoization of index snapshots
//! - `query`: generic filter / sort / paginate operators
//! - `store`: query operations exposed to the HTTP layer
//! - `api`: REST endpoints (actix-web)
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: one JSON source document keyed by `TITULO <roman>` headings
//! - **Output**: JSON records and pagination envelopes over HTTP
//! - **Consistency**: immutable index snapshots, rebuilt only when the
//!   source document's mtime changes
//!
//! ## Usage
//! ```rust,no_run
//! use constitucion_api::{config::Config, store::ConstitucionStore};
//!
//! let config = Config::from_file("config.toml")?;
//! let store = ConstitucionStore::new(&config.document, &config.cache, &config.pagination);
//! let titulo = store.get_titulo("III")?;
//! println!("{}", titulo.nombre);
//! # Ok::<(), constitucion_api::errors::ConstitucionError>(())
//! ```

// Core modules
pub mod api;
pub mod cache;
pub mod config;
pub mod document;
pub mod errors;
pub mod index;
pub mod query;
pub mod roman;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use document::{Articulo, Capitulo, Paginacion, Titulo};
pub use errors::{ConstitucionError, Result};
pub use store::{ConstitucionStore, ConsultaParams};

use std::sync::Arc;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub store: Arc<store::ConstitucionStore>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}
