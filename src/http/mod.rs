//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, listener, graceful shutdown)
//!     → request.rs (assign x-request-id)
//!     → registered handler (see health module)
//!     → Send to client
//! ```
//!
//! The bootstrap only sees the `HttpRouter` trait from router.rs, so it can be
//! driven by a fake in tests.

pub mod request;
pub mod router;
pub mod server;

pub use request::X_REQUEST_ID;
pub use router::{HandlerFn, HttpRouter, RunMode, ServerError};
pub use server::AxumRouter;
