use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde_json::Value;

use crate::dashboard::stats::{summarize, DashboardSummary};
use crate::http::response::ProxyError;
use crate::http::server::AppState;

/// `GET /api/dashboard`
pub async fn summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardSummary>, ProxyError> {
    let reply = state.backend(&headers).results().await?;
    if !reply.is_success() {
        return Err(ProxyError::backend_status("Failed to fetch results", &reply));
    }

    let items: Vec<Value> =
        serde_json::from_str(&reply.body).map_err(|_| ProxyError::invalid_json(&reply))?;

    Ok(Json(summarize(&items, Utc::now())))
}
