//! Error types for the admission pipeline.
//!
//! Decode and evaluation errors never reach the transport: the review
//! pipeline maps each variant onto a denied verdict. Only encoding and
//! server bootstrap errors escape.

use thiserror::Error;

/// The request body could not be decoded into an AdmissionReview
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed JSON or a field of the wrong type
    #[error("Failed to decode AdmissionReview: {0}")]
    Json(#[from] serde_json::Error),
}

/// A predicate hit data it could not interpret
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The admitted object's `metadata.labels` is not a string-to-string map
    #[error("invalid object metadata: {0}")]
    InvalidObject(#[from] serde_json::Error),
}

/// Why a predicate did not pass
#[derive(Error, Debug)]
pub enum Rejection {
    /// The policy rejected the object; the message is shown to the user verbatim
    #[error("{0}")]
    Denied(String),

    /// The policy could not be evaluated
    #[error("Error during validation: {0}")]
    Fault(#[from] EvaluationError),
}

impl Rejection {
    /// Create a policy denial
    pub fn denied(message: impl Into<String>) -> Self {
        Rejection::Denied(message.into())
    }

    /// Check if this rejection came from an evaluation fault
    pub fn is_fault(&self) -> bool {
        matches!(self, Rejection::Fault(_))
    }
}

/// A verdict could not be serialized
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to encode AdmissionReview: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// The listening socket could not be bound
    #[error("Failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}
