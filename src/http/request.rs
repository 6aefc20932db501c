//! Request ID handling.
//!
//! # Responsibilities
//! - Generate a UUID `x-request-id` for requests that arrive without one
//! - Keep a caller-supplied id untouched
//! - Echo the id on the response so clients can correlate log lines

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns an id to requests that do not carry one. Must be outermost.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
