//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     AppConfig → select mode → register /health → bind and serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown of the HTTP server
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes, listener last
//! - Any startup error is fatal

pub mod signals;
pub mod startup;

pub use startup::{listen_address, start, BootstrapError, Phase, ServiceBootstrap};
