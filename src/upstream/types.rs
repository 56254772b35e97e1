//! Upstream reply and error types.

use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Maximum number of characters of a backend body echoed back in diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 500;

/// A fully read backend response.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// First [`BODY_PREVIEW_CHARS`] characters of the body.
    pub fn preview(&self) -> String {
        body_preview(&self.body)
    }
}

/// Truncate a body to at most [`BODY_PREVIEW_CHARS`] characters.
///
/// Counts Unicode scalar values, never splitting a multi-byte character.
pub fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((cut, _)) => body[..cut].to_string(),
        None => body.to_string(),
    }
}

/// `{ "match": "<name>" }` as returned by the resolve and latest-file endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MatchReply {
    #[serde(rename = "match", default)]
    pub matched: Option<String>,
}

impl MatchReply {
    /// The matched name, ignoring empty strings.
    pub fn into_name(self) -> Option<String> {
        self.matched.filter(|m| !m.trim().is_empty())
    }
}

/// One row of the `/api/results` listing. Only the file name matters here.
#[derive(Debug, Deserialize)]
pub struct ListingEntry {
    #[serde(default)]
    pub filename: Option<String>,
}

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not be sent or its body could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL cannot carry a path.
    #[error("backend base URL '{0}' cannot be used as a base")]
    InvalidBase(String),

    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}
