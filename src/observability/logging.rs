//! Structured logging.
//!
//! # Responsibilities
//! - Install the global tracing subscriber once, at startup
//! - Pick format and default verbosity from the run mode
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for release, pretty format for debug
//! - `RUST_LOG` always wins over the mode's default filter

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::http::RunMode;

/// Filter from `RUST_LOG`, or the mode's default.
pub fn env_filter(mode: RunMode) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| mode.default_log_filter().into())
}

/// Install the global subscriber for `mode`. Call once.
pub fn init_logging(mode: RunMode) {
    let registry = tracing_subscriber::registry().with(env_filter(mode));
    match mode {
        RunMode::Release => registry.with(fmt::layer().json()).init(),
        RunMode::Debug => registry.with(fmt::layer()).init(),
    }
}
