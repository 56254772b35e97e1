//! Interview backend client subsystem.
//!
//! # Data Flow
//! ```text
//! proxy / resolution handler
//!     → client.rs (build URL, attach request ID, send with timeouts)
//!     → backend (configured origin)
//!     → types.rs (UpstreamReply: status + full body text)
//!     → back to the handler for parse / preview / fallback decisions
//! ```
//!
//! Lookup endpoints (`resolve_*`, `latest_*`, the result listing) are
//! advisory: their failures collapse to `None` instead of an error.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{body_preview, UpstreamError, UpstreamReply, BODY_PREVIEW_CHARS};
