//! Resolving routes for named artifacts.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::response::{parse_json, ProxyError, Resolved};
use crate::http::server::AppState;
use crate::resolution::{ArtifactKind, Resolution, Resolver};
use crate::upstream::BackendClient;

/// `GET /api/questions/{filename}`
pub async fn questions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Response, ProxyError> {
    serve_artifact(&state.backend(&headers), ArtifactKind::Questions, &filename).await
}

/// `GET /api/view-result/{filename}`
pub async fn view_result(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Response, ProxyError> {
    serve_artifact(&state.backend(&headers), ArtifactKind::Result, &filename).await
}

async fn serve_artifact(
    client: &BackendClient,
    kind: ArtifactKind,
    requested: &str,
) -> Result<Response, ProxyError> {
    let resolution = Resolver::new(client, kind).resolve(requested).await?;
    render(kind, requested, resolution)
}

/// Turn a chain outcome into the HTTP response.
///
/// A payload served under a different name than requested is wrapped as
/// `{"__resolved": name, "data": payload}`.
pub fn render(
    kind: ArtifactKind,
    requested: &str,
    resolution: Resolution,
) -> Result<Response, ProxyError> {
    match resolution {
        Resolution::Found(attempt) => {
            let substituted = attempt.name != requested;
            let data = match parse_json(&attempt.reply) {
                Ok(data) => data,
                Err(e) if substituted => return Err(e.with_resolved(attempt.name)),
                Err(e) => return Err(e),
            };

            if substituted {
                tracing::info!(
                    kind = kind.as_str(),
                    requested,
                    resolved = %attempt.name,
                    source = attempt.source.as_str(),
                    "Served artifact under resolved name"
                );
                Ok(Json(Resolved {
                    name: attempt.name,
                    data,
                })
                .into_response())
            } else {
                Ok(Json(data).into_response())
            }
        }
        Resolution::Exhausted(Some(last)) => {
            tracing::warn!(
                kind = kind.as_str(),
                requested,
                status = %last.reply.status,
                "Artifact not found after every fallback"
            );
            Err(ProxyError::backend_status(kind.failure_label(), &last.reply))
        }
        Resolution::Exhausted(None) => Err(ProxyError::unavailable(kind.failure_label())),
    }
}
