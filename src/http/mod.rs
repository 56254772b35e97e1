//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route table)
//!     → request.rs (request ID assigned / propagated)
//!     → proxy / dashboard handlers
//!     → response.rs (pass-through JSON or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ErrorEnvelope, ProxyError};
pub use server::{AppState, HttpServer};
