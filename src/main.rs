//! # Constitution API Main Driver
//!
//! ## Purpose
//! Entry point for the constitution API server. Loads configuration, wires up
//! the document store and starts the web server.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Construct the document store (index built lazily on first request)
//! 4. Start the web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use constitucion_api::{
    api::ApiServer,
    config::Config,
    errors::{ConstitucionError, Result},
    store::ConstitucionStore,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("constitucion-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("ACT Panama")
        .about("REST API for querying the Constitution of Panama")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").expect("has default");
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!("Starting Constitución de Panamá API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);
    info!("Source document: {}", config.document.path.display());

    if !config.document.path.exists() {
        warn!(
            "Source document {} does not exist yet; requests will fail until it appears",
            config.document.path.display()
        );
    }

    let store = Arc::new(ConstitucionStore::new(
        &config.document,
        &config.cache,
        &config.pagination,
    ));

    let app_state = AppState {
        config: config.clone(),
        store,
        started_at: chrono::Utc::now(),
    };

    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Constitution API started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Constitution API shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config
            .logging
            .level
            .parse()
            .map_err(|_| ConstitucionError::Config {
                message: format!("Invalid log level: {}", config.logging.level),
            })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}
