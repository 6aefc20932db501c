//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! <dir>/.env (optional secrets)
//!     → source.rs (loaded into the process environment, best effort)
//! <dir>/app.env | <dir>/app (optional)
//!     → source.rs (parsed as KEY=VALUE pairs)
//! process environment (recognized keys only)
//!     → loader.rs (per-key override, then bind through schema.rs table)
//!     → AppConfig (immutable, shared via Arc by the bootstrap)
//! ```
//!
//! # Design Decisions
//! - Resolution is a plain function of a directory and an environment view,
//!   no process-wide registry
//! - A missing config file is fine; a broken one is fatal
//! - Field binding goes through an explicit key table

pub mod loader;
pub mod schema;
pub mod source;

pub use loader::{resolve, resolve_with, ConfigError, ConfigResolver, Resolution};
pub use schema::{AppConfig, ConfigValue, FieldBinding};
pub use source::{EnvSource, ProcessEnv};
