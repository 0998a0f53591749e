//! The admission pipeline: decode, evaluate, encode.
//!
//! Pure and re-entrant. Decode and evaluation faults are folded into
//! denied verdicts so the API server always receives a parseable envelope.

use tracing::{debug, error, info, warn};

use crate::error::EncodeError;
use crate::webhooks::codec::{self, AdmissionVerdict};
use crate::webhooks::policies::ValidationEngine;

/// How a review was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    Denied,
    /// The body was not a decodable AdmissionReview
    DecodeError,
    /// The verdict could not be serialized
    EncodeError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Allowed => "allowed",
            Outcome::Denied => "denied",
            Outcome::DecodeError => "decode_error",
            Outcome::EncodeError => "encode_error",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub verdict: AdmissionVerdict,
    pub outcome: Outcome,
}

impl Decision {
    /// Deny a request whose body could not be read at all
    pub fn unreadable(reason: impl std::fmt::Display) -> Self {
        Self {
            verdict: AdmissionVerdict::denied("", format!("Failed to read AdmissionReview body: {reason}")),
            outcome: Outcome::DecodeError,
        }
    }
}

/// Decode `body` and evaluate it. Never fails.
pub fn admit(engine: &ValidationEngine, body: &[u8]) -> Decision {
    let request = match codec::decode(body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Failed to decode admission request");
            return Decision {
                verdict: AdmissionVerdict::denied("", e.to_string()),
                outcome: Outcome::DecodeError,
            };
        }
    };

    debug!(
        uid = %request.uid,
        operation = ?request.operation,
        kind = ?request.kind,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );
    if request.uid.is_empty() {
        warn!("Admission request has no uid, response cannot be correlated");
    }

    let verdict = engine.evaluate(&request);
    let outcome = if verdict.allowed {
        info!(uid = %verdict.uid, "Admission request allowed");
        Outcome::Allowed
    } else {
        warn!(uid = %verdict.uid, message = %verdict.message, "Admission request denied");
        Outcome::Denied
    };

    Decision { verdict, outcome }
}

/// Run the full pipeline over a request body, producing the response body
pub fn review(engine: &ValidationEngine, body: &[u8]) -> Result<Vec<u8>, EncodeError> {
    codec::encode(&admit(engine, body).verdict)
}
