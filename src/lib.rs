//! owner-label-webhook library crate
//!
//! A Kubernetes ValidatingAdmissionWebhook that denies objects without an
//! `owner` label. This module exports the envelope codec, the validation
//! engine and the HTTP server.

pub mod config;
pub mod error;
pub mod health;
pub mod webhooks;

pub use config::{Config, TransportMode, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH};
pub use error::WebhookError;
pub use webhooks::{ValidationEngine, review, run_webhook_server};
