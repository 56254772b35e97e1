//! Inbound proxy routes.
//!
//! # Data Flow
//! ```text
//! page / client
//!     → passthrough.rs  (history, results, result-status, submit-interview)
//!     → upload.rs       (multipart rewrap → upload_cv)
//!     → artifacts.rs    (questions, view-result → resolution chain)
//!     → upstream::BackendClient
//!     → http::response  (pass-through or error envelope)
//! ```

pub mod artifacts;
pub mod passthrough;
pub mod upload;
