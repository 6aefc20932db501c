//! Liveness endpoint.
//!
//! `GET /health` answers `{"status":"up","env":"<APP_ENV>"}` with 200. It reads
//! only the shared config, so concurrent calls need no synchronization.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::http::HandlerFn;

/// Path the health handler is registered on.
pub const HEALTH_PATH: &str = "/health";

/// Value of `status` whenever the process can answer at all.
pub const STATUS_UP: &str = "up";

/// Health response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub env: String,
}

impl HealthStatus {
    pub fn up(env: impl Into<String>) -> Self {
        Self {
            status: STATUS_UP.to_string(),
            env: env.into(),
        }
    }
}

/// Build the health handler over a shared config.
pub fn health_handler(config: Arc<AppConfig>) -> HandlerFn {
    Arc::new(move || {
        (
            StatusCode::OK,
            Json(HealthStatus::up(config.environment_name.as_str())),
        )
            .into_response()
    })
}
