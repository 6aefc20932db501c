//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, bootstrap, http
//!     → tracing events and tower_http request spans
//!     → logging.rs subscriber (stdout)
//! ```

pub mod logging;
