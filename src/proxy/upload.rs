//! CV / JD upload proxy.
//!
//! The inbound multipart form is rebuilt field-for-field, in order, and
//! posted to the backend. File parts keep their file name and content type.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    http::HeaderMap,
    Json,
};
use reqwest::multipart::{Form, Part};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::http::response::{parse_json, ProxyError};
use crate::http::server::AppState;

const UPLOAD_FAILED: &str = "Upload failed";

/// `POST /api/upload-cv`
///
/// Expected fields are `cv_file`, `job_title`, `level` and an optional
/// `jd_file`, but no field is checked here.
pub async fn upload_cv(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Box<RawValue>>, ProxyError> {
    // A body that is not multipart at all fails like any other proxy error.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Upload body is not multipart");
        ProxyError::proxy_failure(rejection.body_text())
    })?;
    let mut form = Form::new();
    let mut fields = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let (name, part) = rewrap_field(field).await?;
        form = form.part(name, part);
        fields += 1;
    }

    tracing::debug!(fields, "Forwarding CV upload");

    let reply = state.backend(&headers).upload_cv(form).await?;

    if !reply.is_success() {
        let json = serde_json::from_str::<Value>(&reply.body)
            .unwrap_or_else(|_| serde_json::json!({ "raw": reply.preview() }));
        return Err(ProxyError::backend_status(UPLOAD_FAILED, &reply).with_json(json));
    }

    parse_json(&reply).map(Json)
}

async fn rewrap_field(field: Field<'_>) -> Result<(String, Part), ProxyError> {
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(invalid_form)?;

    let mut part = Part::bytes(data.to_vec());
    if let Some(file_name) = file_name {
        part = part.file_name(file_name);
    }
    if let Some(content_type) = content_type {
        part = part.mime_str(&content_type).map_err(|_| {
            ProxyError::invalid_request(
                "Invalid multipart body",
                format!("field '{}' has an invalid content type", name),
            )
        })?;
    }

    Ok((name, part))
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> ProxyError {
    let status = err.status();
    ProxyError::invalid_request("Invalid multipart body", err.body_text()).with_status(status)
}
