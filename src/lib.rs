//! Interview gateway library.
//!
//! HTTP gateway in front of the interview-processing backend: pass-through
//! routes, artifact name resolution with fallbacks, and dashboard aggregates.

pub mod config;
pub mod dashboard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resolution;
pub mod security;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
