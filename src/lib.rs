//! Layered configuration resolution and a minimal health-checked HTTP service.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, ConfigError, ConfigResolver};
pub use http::{AxumRouter, HttpRouter, RunMode};
pub use lifecycle::{start, ServiceBootstrap};
