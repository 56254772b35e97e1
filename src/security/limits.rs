//! Request size limits.

use tower_http::limit::RequestBodyLimitLayer;

/// Reject inbound bodies larger than `max_bytes` with 413.
///
/// Covers uploads too, so the CV form is capped before it is buffered.
pub fn body_limit_layer(max_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_bytes)
}
