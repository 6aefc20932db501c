//! Startup orchestration.
//!
//! # Phases
//! ```text
//! Uninitialized → ModeSelected → RoutesRegistered → Serving
//!     Serving → Terminated (fatal bind/serve error)
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retry or fallback port
//! - Steps run in order and refuse to run out of order
//! - The config is frozen in an `Arc` before any handler sees it

use std::sync::Arc;

use axum::http::Method;
use thiserror::Error;

use crate::config::AppConfig;
use crate::health::{health_handler, HEALTH_PATH};
use crate::http::{HttpRouter, RunMode, ServerError};

/// Bootstrap progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    ModeSelected,
    RoutesRegistered,
    Serving,
    Terminated,
}

/// Error type for the bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot run {step} in phase {actual:?}, expected {expected:?}")]
    OutOfOrder {
        step: &'static str,
        expected: Phase,
        actual: Phase,
    },

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Listen address for `port` on all interfaces.
pub fn listen_address(port: &str) -> String {
    format!("0.0.0.0:{}", port)
}

/// Drives an [`HttpRouter`] from a resolved [`AppConfig`].
pub struct ServiceBootstrap<R> {
    config: Arc<AppConfig>,
    router: R,
    phase: Phase,
}

impl<R: HttpRouter> ServiceBootstrap<R> {
    pub fn new(config: AppConfig, router: R) -> Self {
        Self {
            config: Arc::new(config),
            router,
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn expect_phase(&self, step: &'static str, expected: Phase) -> Result<(), BootstrapError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BootstrapError::OutOfOrder {
                step,
                expected,
                actual: self.phase,
            })
        }
    }

    /// Pick the run mode from `environment_name` and hand it to the router.
    pub fn select_mode(&mut self) -> Result<RunMode, BootstrapError> {
        self.expect_phase("select_mode", Phase::Uninitialized)?;

        let mode = RunMode::from_environment(&self.config.environment_name);
        self.router.set_mode(mode);
        self.phase = Phase::ModeSelected;

        tracing::info!(
            environment = %self.config.environment_name,
            mode = %mode,
            "Runtime mode selected"
        );
        Ok(mode)
    }

    /// Register `GET /health`.
    pub fn register_routes(&mut self) -> Result<(), BootstrapError> {
        self.expect_phase("register_routes", Phase::ModeSelected)?;

        self.router.register_handler(
            Method::GET,
            HEALTH_PATH,
            health_handler(Arc::clone(&self.config)),
        )?;
        self.phase = Phase::RoutesRegistered;
        Ok(())
    }

    /// Bind `0.0.0.0:<port>` and serve until shutdown or a fatal error.
    pub async fn serve(self) -> Result<(), BootstrapError> {
        self.expect_phase("serve", Phase::RoutesRegistered)?;

        let address = listen_address(&self.config.port);
        tracing::info!(address = %address, phase = ?Phase::Serving, "Server starting");

        match self.router.listen_and_serve(&address).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, phase = ?Phase::Terminated, "Server terminated");
                Err(e.into())
            }
        }
    }
}

/// Select the mode, register the health check and serve.
pub async fn start<R: HttpRouter>(config: AppConfig, router: R) -> Result<(), BootstrapError> {
    let mut bootstrap = ServiceBootstrap::new(config, router);
    bootstrap.select_mode()?;
    bootstrap.register_routes()?;
    bootstrap.serve().await
}
