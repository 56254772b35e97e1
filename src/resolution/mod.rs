//! Artifact resolution subsystem.
//!
//! # Data Flow
//! ```text
//! requested name
//!     → chain.rs (ordered candidate sources, first success wins)
//!         → hint lookup / latest file / listing (advisory, non-fatal)
//!         → fuzzy.rs (accent-insensitive listing match)
//!         → artifact fetch under the candidate name
//!     → Resolution::Found(attempt) | Resolution::Exhausted(last attempt)
//! ```
//!
//! Backend file names are not guaranteed to match what a caller holds
//! (transliteration, timestamps, renames), so the gateway tolerates drift
//! instead of failing on the first miss.

pub mod chain;
pub mod fuzzy;

pub use chain::{longest_chain, ArtifactKind, Attempt, Resolution, Resolver, Source};
