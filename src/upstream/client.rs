//! HTTP client for the interview backend.
//!
//! # Responsibilities
//! - Build backend URLs from the configured origin
//! - Apply connect and per-call timeouts to every outbound request
//! - Forward the inbound request ID
//! - Read each response body in full so callers can parse or preview it

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::HeaderValue;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use url::Url;

use crate::config::{BackendConfig, TimeoutConfig};
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::upstream::types::{ListingEntry, MatchReply, UpstreamError, UpstreamReply};

/// Client for the interview backend's HTTP API.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    request_id: Option<HeaderValue>,
}

impl BackendClient {
    /// Create a client for the configured backend origin.
    pub fn new(backend: &BackendConfig, timeouts: &TimeoutConfig) -> Result<Self, UpstreamError> {
        let base = Url::parse(&backend.base_url)?;
        if base.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBase(backend.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;

        Ok(Self {
            http,
            base,
            request_id: None,
        })
    }

    /// A copy of this client that tags every call with `request_id`.
    pub fn for_request(&self, request_id: Option<HeaderValue>) -> Self {
        Self {
            request_id,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /api/history`
    pub async fn history(&self) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["api", "history"], &[])?;
        self.send("history", self.http.get(url)).await
    }

    /// `GET /api/results`
    pub async fn results(&self) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["api", "results"], &[])?;
        self.send("results", self.http.get(url)).await
    }

    /// `GET /api/result_status?log=<log>`
    pub async fn result_status(&self, log: &str) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["api", "result_status"], &[("log", log)])?;
        self.send("result_status", self.http.get(url)).await
    }

    /// `POST /submit_interview` with a JSON body forwarded as-is.
    pub async fn submit_interview(&self, body: Bytes) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["submit_interview"], &[])?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send("submit_interview", request).await
    }

    /// `POST /api/upload_cv` with a multipart form.
    pub async fn upload_cv(&self, form: Form) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["api", "upload_cv"], &[])?;
        self.send("upload_cv", self.http.post(url).multipart(form)).await
    }

    /// `GET /api/questions/<name>`
    pub async fn questions(&self, name: &str) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["api", "questions", name], &[])?;
        self.send("questions", self.http.get(url)).await
    }

    /// `GET /api/view_result?hint=<name>`
    ///
    /// The query-string form avoids path-encoding problems with accented names.
    pub async fn view_result(&self, name: &str) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&["api", "view_result"], &[("hint", name)])?;
        self.send("view_result", self.http.get(url)).await
    }

    /// `GET /api/resolve_questions_file?hint=<hint>`
    pub async fn resolve_questions_file(&self, hint: &str) -> Option<String> {
        let url = self
            .endpoint(&["api", "resolve_questions_file"], &[("hint", hint)])
            .ok()?;
        self.lookup_match("resolve_questions_file", url).await
    }

    /// `GET /api/latest_questions_file`
    pub async fn latest_questions_file(&self) -> Option<String> {
        let url = self.endpoint(&["api", "latest_questions_file"], &[]).ok()?;
        self.lookup_match("latest_questions_file", url).await
    }

    /// `GET /api/resolve_result_file?hint=<hint>`
    pub async fn resolve_result_file(&self, hint: &str) -> Option<String> {
        let url = self
            .endpoint(&["api", "resolve_result_file"], &[("hint", hint)])
            .ok()?;
        self.lookup_match("resolve_result_file", url).await
    }

    /// File names from `GET /api/results`, in listing order.
    ///
    /// Any failure yields `None`; the listing is only ever used as a fallback.
    pub async fn result_filenames(&self) -> Option<Vec<String>> {
        let reply = match self.results().await {
            Ok(reply) if reply.is_success() => reply,
            Ok(reply) => {
                tracing::debug!(status = %reply.status, "Result listing unavailable");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Result listing unavailable");
                return None;
            }
        };

        match serde_json::from_str::<Vec<ListingEntry>>(&reply.body) {
            Ok(entries) => Some(entries.into_iter().filter_map(|e| e.filename).collect()),
            Err(e) => {
                tracing::debug!(error = %e, "Result listing is not a JSON array");
                None
            }
        }
    }

    /// Query an endpoint answering `{ "match": ... }`. Every failure is `None`.
    async fn lookup_match(&self, operation: &'static str, url: Url) -> Option<String> {
        let reply = match self.send(operation, self.http.get(url)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(operation, error = %e, "Lookup failed");
                return None;
            }
        };

        if !reply.is_success() {
            tracing::debug!(operation, status = %reply.status, "Lookup returned no match");
            return None;
        }

        serde_json::from_str::<MatchReply>(&reply.body)
            .ok()
            .and_then(MatchReply::into_name)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<UpstreamReply, UpstreamError> {
        let start = Instant::now();
        let request = match &self.request_id {
            Some(id) => request.header(X_REQUEST_ID, id.clone()),
            None => request,
        };

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(UpstreamReply { status, body })
        }
        .await;

        match &result {
            Ok(reply) => {
                tracing::debug!(
                    operation,
                    status = %reply.status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Backend call completed"
                );
                metrics::record_upstream_call(operation, reply.status.as_u16(), start);
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "Backend call failed");
                metrics::record_upstream_failure(operation, start);
            }
        }

        Ok(result?)
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBase(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}
