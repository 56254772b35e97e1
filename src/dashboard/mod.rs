//! Dashboard aggregates.
//!
//! Totals, score average, per-type counts, a 7-day activity series and the
//! most recent sessions, derived from the backend's result listing.

pub mod handlers;
pub mod stats;

pub use stats::{summarize, DashboardSummary, DayCount};
