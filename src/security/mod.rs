//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (cap body size)
//!     → handler
//! Outgoing response:
//!     → headers.rs (security headers, optional)
//! ```

pub mod headers;
pub mod limits;
