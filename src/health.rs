//! Health and metrics endpoints.
//!
//! Provides:
//! - `/healthz` - Liveness probe (always returns 200 if server is running)
//! - `/metrics` - Prometheus metrics endpoint
//!
//! Neither endpoint touches the validation engine.

use std::sync::Arc;

use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabel, EncodeLabelSet, LabelSetEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

use crate::webhooks::Outcome;

/// Labels for admission review metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct OutcomeLabels {
    pub outcome: Outcome,
}

impl EncodeLabelSet for OutcomeLabels {
    fn encode(&self, mut encoder: LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("outcome", self.outcome.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Shared metrics for the webhook
pub struct Metrics {
    /// Admission reviews by outcome
    pub admission_reviews_total: Family<OutcomeLabels, Counter>,
    /// Time spent producing a response
    pub admission_review_duration_seconds: Histogram,
    /// Prometheus registry
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance with registered metrics
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let admission_reviews_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "owner_label_webhook_admission_reviews",
            "Total number of admission reviews by outcome",
            admission_reviews_total.clone(),
        );

        let admission_review_duration_seconds = Histogram::new(exponential_buckets(0.0001, 2.0, 15));
        registry.register(
            "owner_label_webhook_admission_review_duration_seconds",
            "Duration of admission review handling in seconds",
            admission_review_duration_seconds.clone(),
        );

        Self {
            admission_reviews_total,
            admission_review_duration_seconds,
            registry,
        }
    }

    /// Record a handled admission review
    pub fn record_review(&self, outcome: Outcome, duration_secs: f64) {
        self.admission_reviews_total
            .get_or_create(&OutcomeLabels { outcome })
            .inc();
        self.admission_review_duration_seconds.observe(duration_secs);
    }

    /// Number of reviews recorded with `outcome`
    pub fn reviews(&self, outcome: Outcome) -> u64 {
        self.admission_reviews_total
            .get_or_create(&OutcomeLabels { outcome })
            .get()
    }

    /// Encode metrics to Prometheus text format
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}

/// Liveness probe handler
///
/// Returns 200 OK if the process is alive.
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Metrics handler
async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> impl IntoResponse {
    let body = metrics.encode();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// Create the health router
pub fn create_router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}
