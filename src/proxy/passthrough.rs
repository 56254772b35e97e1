//! Direct pass-through routes.
//!
//! Each handler makes exactly one backend call and applies the common
//! contract: backend failures keep their status, 2xx JSON is returned
//! untouched, 2xx non-JSON becomes 502, transport failures become 500.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::http::response::{passthrough, ProxyError};
use crate::http::server::AppState;

type JsonResult = Result<Json<Box<RawValue>>, ProxyError>;

/// `GET /api/history`
pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> JsonResult {
    let reply = state.backend(&headers).history().await?;
    passthrough("Failed to fetch history", reply)
}

/// `GET /api/results`
pub async fn results(State(state): State<AppState>, headers: HeaderMap) -> JsonResult {
    let reply = state.backend(&headers).results().await?;
    passthrough("Failed to fetch results", reply)
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Interview log identifier; an absent value is forwarded as empty.
    #[serde(default)]
    pub log: String,
}

/// `GET /api/result-status?log=<id>`
pub async fn result_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StatusQuery>,
) -> JsonResult {
    let reply = state.backend(&headers).result_status(&query.log).await?;
    passthrough("Failed to fetch status", reply)
}

/// `POST /api/submit-interview`
///
/// The body is forwarded verbatim; the backend owns validation.
pub async fn submit_interview(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> JsonResult {
    let reply = state.backend(&headers).submit_interview(body).await?;
    passthrough("Failed to submit interview", reply)
}
