//! Response shaping.
//!
//! # Responsibilities
//! - Pass backend JSON through without re-serializing it
//! - Tag substituted artifacts with the name that was actually served
//! - Map backend failures onto the gateway's error envelope
//!
//! # Design Decisions
//! - Success bodies are validated as `RawValue`, never rebuilt, so field
//!   order and number formatting survive untouched
//! - Error bodies never echo more than a bounded preview of the backend body
//! - Backend error statuses are propagated; local failures use 502 / 500

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::upstream::{UpstreamError, UpstreamReply};

/// Label used when a 2xx backend body is not JSON.
pub const INVALID_JSON: &str = "Invalid JSON from backend";

/// Label used when the outbound call itself failed.
pub const PROXY_ERROR: &str = "Proxy error";

/// JSON body of every gateway error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(rename = "bodyPreview", skip_serializing_if = "Option::is_none")]
    pub body_preview: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(rename = "__resolved", skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,

    /// Parsed backend body, carried by the upload route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

impl ErrorEnvelope {
    fn labelled(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            body_preview: None,
            message: None,
            resolved: None,
            json: None,
        }
    }
}

/// An error response: HTTP status plus envelope.
#[derive(Debug, Clone)]
pub struct ProxyError {
    pub status: StatusCode,
    pub envelope: ErrorEnvelope,
}

impl ProxyError {
    /// The backend answered with a non-success status; propagate it.
    pub fn backend_status(label: &str, reply: &UpstreamReply) -> Self {
        let mut envelope = ErrorEnvelope::labelled(label);
        envelope.status = Some(reply.status.as_u16());
        envelope.body_preview = Some(reply.preview());
        Self {
            status: reply.status,
            envelope,
        }
    }

    /// The backend answered 2xx with a body that is not JSON.
    pub fn invalid_json(reply: &UpstreamReply) -> Self {
        let mut envelope = ErrorEnvelope::labelled(INVALID_JSON);
        envelope.body_preview = Some(reply.preview());
        Self {
            status: StatusCode::BAD_GATEWAY,
            envelope,
        }
    }

    /// The gateway could not complete the request itself.
    pub fn proxy_failure(message: impl Into<String>) -> Self {
        let mut envelope = ErrorEnvelope::labelled(PROXY_ERROR);
        envelope.message = Some(message.into());
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            envelope,
        }
    }

    /// The outbound call could not complete.
    pub fn transport(err: &UpstreamError) -> Self {
        Self::proxy_failure(err.to_string())
    }

    /// The whole inbound request ran past its deadline.
    pub fn deadline_exceeded(limit: Duration) -> Self {
        Self::proxy_failure(format!(
            "request did not complete within {}s",
            limit.as_secs()
        ))
    }

    /// No fallback step ever produced a backend response.
    pub fn unavailable(label: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            envelope: ErrorEnvelope::labelled(label),
        }
    }

    /// The inbound request itself could not be read.
    pub fn invalid_request(label: &str, message: impl Into<String>) -> Self {
        let mut envelope = ErrorEnvelope::labelled(label);
        envelope.message = Some(message.into());
        Self {
            status: StatusCode::BAD_REQUEST,
            envelope,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_resolved(mut self, name: impl Into<String>) -> Self {
        self.envelope.resolved = Some(name.into());
        self
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.envelope.json = Some(json);
        self
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        Self::transport(&err)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

/// Artifact served under a different name than the one requested.
#[derive(Debug, Serialize)]
pub struct Resolved {
    #[serde(rename = "__resolved")]
    pub name: String,
    pub data: Box<RawValue>,
}

/// Validate a successful backend body as JSON without rebuilding it.
pub fn parse_json(reply: &UpstreamReply) -> Result<Box<RawValue>, ProxyError> {
    serde_json::from_str::<Box<RawValue>>(&reply.body).map_err(|_| ProxyError::invalid_json(reply))
}

/// The common direct-route contract: propagate failures, pass JSON through.
pub fn passthrough(label: &str, reply: UpstreamReply) -> Result<Json<Box<RawValue>>, ProxyError> {
    if !reply.is_success() {
        return Err(ProxyError::backend_status(label, &reply));
    }
    parse_json(&reply).map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> UpstreamReply {
        UpstreamReply {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_passthrough_keeps_field_order() {
        let body = r#"{"zeta":1,"alpha":[1.50,2],"mid":{"b":null,"a":true}}"#;
        let Json(raw) = passthrough("x", reply(200, body)).unwrap();
        assert_eq!(raw.get(), body);
    }

    #[test]
    fn test_passthrough_propagates_backend_status() {
        let long = "e".repeat(900);
        let err = passthrough("Failed to fetch history", reply(503, &long)).unwrap_err();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.envelope.error, "Failed to fetch history");
        assert_eq!(err.envelope.status, Some(503));
        assert_eq!(err.envelope.body_preview.unwrap().len(), 500);
    }

    #[test]
    fn test_invalid_json_is_bad_gateway() {
        let err = passthrough("x", reply(200, "<html>oops</html>")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.envelope.error, INVALID_JSON);
        assert_eq!(err.envelope.body_preview.as_deref(), Some("<html>oops</html>"));
        assert_eq!(err.envelope.status, None);
    }

    #[test]
    fn test_deadline_is_proxy_error() {
        let err = ProxyError::deadline_exceeded(Duration::from_secs(150));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.envelope.error, PROXY_ERROR);
        assert_eq!(
            err.envelope.message.as_deref(),
            Some("request did not complete within 150s")
        );
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let err = ProxyError::unavailable("Failed to fetch result");
        let json = serde_json::to_value(&err.envelope).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Failed to fetch result" }));
    }

    #[test]
    fn test_resolved_wraps_raw_payload() {
        let resolved = Resolved {
            name: "quiz_v1_final.json".to_string(),
            data: RawValue::from_string(r#"{"questions":[]}"#.to_string()).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&resolved).unwrap(),
            r#"{"__resolved":"quiz_v1_final.json","data":{"questions":[]}}"#
        );
    }
}
