pub mod config;
pub mod logging;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError, LogFormat, LogLevel};
pub use routes::build_router;
pub use state::AppState;

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Application entry point. Loads configuration, initializes tracing and
/// serves invocations from the Functions host.
pub async fn run() -> Result<(), AppError> {
    let config = Config::load()?;
    logging::init_tracing(config.log_level, config.log_format)?;

    info!(
        version = crate::VERSION,
        port = config.port,
        function_root = %config.function_root.display(),
        tags = config.tag_patterns.len(),
        "Starting azure-log-forwarder"
    );

    let state = Arc::new(AppState::from_config(&config));
    server::serve(build_router(state), config.port).await
}
