//! service-bootstrap
//!
//! Resolves configuration from the current directory and serves `GET /health`.
//!
//! # Startup
//!
//! ```text
//!   ./.env ──────────┐ (into process env, best effort)
//!   ./app.env | ./app ┼──▶ ConfigResolver ──▶ AppConfig ──▶ ServiceBootstrap
//!   APP_ENV/PORT/DB_DSN┘                                     │
//!                                                            ├─ mode: release if APP_ENV=production
//!                                                            ├─ GET /health
//!                                                            └─ listen 0.0.0.0:$PORT
//! ```

use std::process::ExitCode;

use service_bootstrap::config::ConfigResolver;
use service_bootstrap::http::{AxumRouter, RunMode};
use service_bootstrap::lifecycle::start;
use service_bootstrap::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let resolution = match ConfigResolver::new(".").resolve() {
        Ok(resolution) => resolution,
        Err(e) => {
            // Logging is normally configured from the resolved config.
            let environment = std::env::var("APP_ENV").unwrap_or_default();
            init_logging(RunMode::from_environment(&environment));
            tracing::error!(error = %e, "Failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let config = resolution.config;
    init_logging(RunMode::from_environment(&config.environment_name));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment_name,
        "service-bootstrap starting"
    );
    tracing::info!(
        port = %config.port,
        database_configured = !config.database_dsn.is_empty(),
        config_file = ?resolution.config_file,
        secrets_file = ?resolution.secrets_file,
        "Configuration loaded"
    );

    match start(config, AxumRouter::new()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to run server");
            ExitCode::FAILURE
        }
    }
}
