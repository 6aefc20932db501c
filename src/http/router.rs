//! The routing capability the bootstrap depends on.
//!
//! The bootstrap only needs to pick a mode, register handlers and serve, so it
//! talks to this trait rather than to axum directly.

use std::fmt;
use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::http::Method;
use axum::response::Response;
use thiserror::Error;

/// Request handler that depends on nothing in the request.
pub type HandlerFn = Arc<dyn Fn() -> Response + Send + Sync>;

/// Runtime verbosity, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Verbose output, route registrations logged.
    #[default]
    Debug,
    /// Quiet, machine-readable output.
    Release,
}

impl RunMode {
    /// The only environment name that selects [`RunMode::Release`].
    pub const RELEASE_ENVIRONMENT: &'static str = "production";

    pub fn from_environment(environment_name: &str) -> Self {
        if environment_name == Self::RELEASE_ENVIRONMENT {
            RunMode::Release
        } else {
            RunMode::Debug
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Release => "release",
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            RunMode::Debug => "service_bootstrap=debug,tower_http=debug",
            RunMode::Release => "service_bootstrap=info,tower_http=warn",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for route registration and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    /// The router has no way to dispatch this method.
    #[error("unsupported method {method} for {path}")]
    UnsupportedMethod { method: Method, path: String },

    /// The path cannot be routed; it must start with `/`.
    #[error("invalid route path {path:?}: must start with '/'")]
    InvalidPath { path: String },

    /// The same method and path were registered twice.
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },
}

/// Something that can route HTTP requests.
pub trait HttpRouter: Send {
    fn set_mode(&mut self, mode: RunMode);

    fn register_handler(
        &mut self,
        method: Method,
        path: &str,
        handler: HandlerFn,
    ) -> Result<(), ServerError>;

    /// Bind `address` and serve until shutdown or a fatal error.
    fn listen_and_serve(
        self,
        address: &str,
    ) -> impl Future<Output = Result<(), ServerError>> + Send;
}
