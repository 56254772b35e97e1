//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with every gateway route
//! - Wire up middleware (request ID, tracing, timeout, body limit, headers)
//! - Swap the backend client when a new configuration arrives
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::dashboard;
use crate::http::request::{
    propagate_request_id_layer, set_request_id_layer, RequestIdExt, X_REQUEST_ID,
};
use crate::http::response::ProxyError;
use crate::observability::metrics;
use crate::proxy::{artifacts, passthrough, upload};
use crate::security::{headers::apply_security_headers, limits::body_limit_layer};
use crate::upstream::{BackendClient, UpstreamError};

/// Reloadable part of the gateway: the config and the client built from it.
pub struct RuntimeState {
    pub config: GatewayConfig,
    pub backend: BackendClient,
}

impl RuntimeState {
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let backend = BackendClient::new(&config.backend, &config.timeouts)?;
        Ok(Self { config, backend })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<RuntimeState>>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let runtime = RuntimeState::new(config)?;
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(runtime)),
        })
    }

    /// Backend client for one inbound request, tagged with its request ID.
    pub fn backend(&self, headers: &HeaderMap) -> BackendClient {
        self.inner.load().backend.for_request(headers.request_id())
    }

    /// Replace the backend client with one built from `config`.
    ///
    /// Requests already in flight finish against the previous client.
    pub fn reload(&self, config: GatewayConfig) -> Result<(), UpstreamError> {
        let runtime = RuntimeState::new(config)?;
        tracing::info!(backend = %runtime.backend.base_url(), "Backend configuration reloaded");
        self.inner.store(Arc::new(runtime));
        Ok(())
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let state = AppState::new(config.clone())?;
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/api/history", get(passthrough::history))
            .route("/api/results", get(passthrough::results))
            .route("/api/result-status", get(passthrough::result_status))
            .route("/api/submit-interview", post(passthrough::submit_interview))
            .route("/api/upload-cv", post(upload::upload_cv))
            .route("/api/questions/{filename}", get(artifacts::questions))
            .route("/api/view-result/{filename}", get(artifacts::view_result))
            .route("/api/dashboard", get(dashboard::handlers::summary))
            .route("/healthz", get(health))
            .route_layer(middleware::from_fn_with_state(state.clone(), enforce_deadline))
            .route_layer(middleware::from_fn(track_requests))
            .with_state(state);

        let router = if config.security.enable_headers {
            apply_security_headers(router)
        } else {
            router
        };

        router
            .layer(DefaultBodyLimit::disable())
            .layer(body_limit_layer(config.security.max_body_size))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops when `shutdown` fires. Configurations
    /// received on `config_updates` replace the backend client; listener and
    /// middleware settings only change on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.reload(config) {
                    tracing::error!(error = %e, "Rejected configuration update");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The router, for serving or driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
    backend: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.inner.load().backend.base_url().to_string(),
    })
}

/// Bound a whole inbound request, fallback chain included.
///
/// The limit is read per request so reloaded timeouts apply immediately.
/// Expiry drops the in-flight backend call and answers with the proxy
/// error envelope.
async fn enforce_deadline(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = Duration::from_secs(state.inner.load().config.timeouts.request_secs);
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_secs = limit.as_secs(), "Request deadline exceeded");
            ProxyError::deadline_exceeded(limit).into_response()
        }
    }
}

/// Record request count and latency per matched route.
async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}
