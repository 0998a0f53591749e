//! Admission webhook server.
//!
//! Provides HTTP endpoints for the Kubernetes API server:
//! - `POST /validate` - ValidatingAdmissionWebhook callback
//! - `GET /healthz`, `GET /metrics` - see [`crate::health`]
//!
//! The router is built once at startup. Certificates are expected to be
//! provisioned by cert-manager and mounted at `/etc/webhook/certs/`; when
//! they are missing the server runs plain HTTP.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::BytesRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Router, extract::State, routing::post};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use tracing::{error, info, warn};

use crate::config::TransportMode;
use crate::error::WebhookError;
use crate::health::{self, Metrics};
use crate::webhooks::codec;
use crate::webhooks::policies::ValidationEngine;
use crate::webhooks::review::{Decision, Outcome, admit};

/// Grace period for in-flight requests once shutdown begins
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

/// Largest AdmissionReview body buffered by `/validate`.
///
/// An UPDATE carries both `object` and `oldObject`, each up to etcd's
/// ~1.5 MiB object limit. Larger bodies are denied, not refused.
pub const MAX_REVIEW_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub engine: ValidationEngine,
    pub metrics: Arc<Metrics>,
}

impl WebhookState {
    pub fn new(engine: ValidationEngine) -> Self {
        Self {
            engine,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Create the webhook router, including health endpoints
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    let health = health::create_router(state.metrics.clone());
    Router::new()
        .route(
            "/validate",
            post(validate).layer(DefaultBodyLimit::max(MAX_REVIEW_BODY_BYTES)),
        )
        .with_state(state)
        .merge(health)
}

/// ValidatingAdmissionWebhook handler.
///
/// Takes the raw body so malformed or oversized input still gets a 200
/// deny envelope.
async fn validate(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = Instant::now();

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/json") {
        warn!(content_type = %content_type, "Unexpected content type for admission review");
    }

    let decision = match body {
        Ok(body) => admit(&state.engine, &body),
        Err(rejection) => {
            error!(error = %rejection, "Failed to read admission request body");
            Decision::unreadable(rejection)
        }
    };
    match codec::encode(&decision.verdict) {
        Ok(bytes) => {
            state
                .metrics
                .record_review(decision.outcome, started.elapsed().as_secs_f64());
            (StatusCode::OK, [(CONTENT_TYPE, "application/json")], bytes).into_response()
        }
        Err(e) => {
            error!(uid = %decision.verdict.uid, error = %e, "Failed to encode admission response");
            state
                .metrics
                .record_review(Outcome::EncodeError, started.elapsed().as_secs_f64());
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Run the webhook server until `shutdown` resolves
///
/// Binds to the address of `mode`, serving HTTPS with the configured PEM
/// certificate and key. If the certificate material cannot be loaded, or
/// the mode is plain, serves HTTP instead.
pub async fn run_webhook_server<F>(
    mode: TransportMode,
    engine: ValidationEngine,
    shutdown: F,
) -> Result<(), WebhookError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(WebhookState::new(engine));
    let app = create_webhook_router(state);

    let (addr, cert, key, fallback) = match mode {
        TransportMode::Plain { addr } => return serve_plain(addr, app, shutdown).await,
        TransportMode::Tls {
            addr,
            cert,
            key,
            fallback,
        } => (addr, cert, key, fallback),
    };

    let config = match RustlsConfig::from_pem_file(&cert, &key).await {
        Ok(config) => config,
        Err(e) => {
            let e = WebhookError::TlsConfig(e.to_string());
            warn!(
                error = %e,
                cert = %cert.display(),
                key = %key.display(),
                "Unable to load TLS certificates, falling back to plain HTTP"
            );
            return serve_plain(fallback, app, shutdown).await;
        }
    };

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown.await;
            handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)));
        }
    });

    info!(port = addr.port(), "Webhook server listening with TLS");
    axum_server::bind_rustls(addr, config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    info!("Webhook server stopped");
    Ok(())
}

async fn serve_plain<F>(addr: SocketAddr, app: Router, shutdown: F) -> Result<(), WebhookError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebhookError::Bind)?;

    info!(port = addr.port(), "Webhook server listening without TLS");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    info!("Webhook server stopped");
    Ok(())
}
