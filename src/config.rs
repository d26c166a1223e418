//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the constitution API: server binding, source
//! document location, index cache sizing, pagination bounds and logging, with
//! type-safe access and validation.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use constitucion_api::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{ConstitucionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Source document settings
    pub document: DocumentConfig,
    /// Index cache settings
    pub cache: CacheConfig,
    /// Pagination bounds
    pub pagination: PaginationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

/// Source document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Path to the constitution JSON document
    pub path: PathBuf,
}

/// Index cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of index snapshots kept in memory, one per observed
    /// source mtime
    pub max_snapshots: usize,
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size applied when the request does not specify one
    pub default_page_size: i64,
    /// Upper clamp for requested page sizes
    pub max_page_size: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| ConstitucionError::Config {
                message: format!("Failed to read config file {:?}: {}", path, e),
            })?;

            toml::from_str(&content).map_err(|e| ConstitucionError::Config {
                message: format!("Failed to parse config file {:?}: {}", path, e),
            })?
        } else {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("CONSTITUCION_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CONSTITUCION_PORT") {
            self.server.port = port.parse().map_err(|_| ConstitucionError::Config {
                message: "Invalid port number in CONSTITUCION_PORT".to_string(),
            })?;
        }
        if let Ok(file) = std::env::var("CONSTITUCION_FILE") {
            self.document.path = PathBuf::from(file);
        }
        if let Ok(level) = std::env::var("CONSTITUCION_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ConstitucionError::Config {
                message: "server.port cannot be zero".to_string(),
            });
        }

        if self.cache.max_snapshots == 0 {
            return Err(ConstitucionError::Config {
                message: "cache.max_snapshots must be greater than zero".to_string(),
            });
        }

        if self.pagination.default_page_size < 1 {
            return Err(ConstitucionError::Config {
                message: "pagination.default_page_size must be at least 1".to_string(),
            });
        }

        if self.pagination.max_page_size < self.pagination.default_page_size {
            return Err(ConstitucionError::Config {
                message: "pagination.max_page_size cannot be below the default page size"
                    .to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            document: DocumentConfig::default(),
            cache: CacheConfig::default(),
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/constitucion_panama.json"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_snapshots: 8 }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
