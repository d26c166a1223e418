//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the constitution API, covering domain-level
//! not-found outcomes and the few genuinely fatal failure modes (source
//! document I/O, configuration).
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from the store, cache and configuration layers
//! - **Output**: Structured error types with context for logging and HTTP mapping
//! - **Error Categories**: NotFound, Document, Configuration, Internal
//!
//! ## Key Features
//! - Not-found results are ordinary values, never fatal
//! - Source document read/parse failures bubble up as server errors
//! - Automatic conversion from I/O and JSON errors
//! - Category accessor for structured logging

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ConstitucionError>;

/// Error types for the constitution query API
#[derive(Debug, Error)]
pub enum ConstitucionError {
    /// Requested Titulo has no match in the current index snapshot
    #[error("Título no encontrado")]
    TituloNotFound { identifier: String },

    /// Requested Capitulo has no match within the resolved Titulo
    #[error("Capítulo no encontrado")]
    CapituloNotFound { titulo_num: u32, capitulo_num: u32 },

    /// Requested Articulo number has no match in the current index snapshot
    #[error("Artículo no encontrado")]
    ArticuloNotFound { numero: u32 },

    /// Source document could not be read from disk
    #[error("Failed to read source document '{path}': {source}")]
    DocumentRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source document is not valid JSON
    #[error("Failed to parse source document '{path}': {details}")]
    DocumentParse { path: String, details: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConstitucionError {
    /// True for domain-level not-found outcomes, which map to HTTP 404
    /// rather than a server error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConstitucionError::TituloNotFound { .. }
                | ConstitucionError::CapituloNotFound { .. }
                | ConstitucionError::ArticuloNotFound { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            ConstitucionError::TituloNotFound { .. }
            | ConstitucionError::CapituloNotFound { .. }
            | ConstitucionError::ArticuloNotFound { .. } => "not_found",
            ConstitucionError::DocumentRead { .. }
            | ConstitucionError::DocumentParse { .. } => "document",
            ConstitucionError::Config { .. } => "configuration",
            ConstitucionError::Internal { .. } => "internal",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for ConstitucionError {
    fn from(err: std::io::Error) -> Self {
        ConstitucionError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for ConstitucionError {
    fn from(err: serde_json::Error) -> Self {
        ConstitucionError::Internal {
            message: format!("JSON error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = ConstitucionError::TituloNotFound {
            identifier: "XL".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.category(), "not_found");

        let err = ConstitucionError::Config {
            message: "bad port".to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn test_not_found_messages_are_spanish() {
        let err = ConstitucionError::ArticuloNotFound { numero: 999 };
        assert_eq!(err.to_string(), "Artículo no encontrado");
    }
}
