//! Webhook module for validating admission requests.
//!
//! A request flows through a strict pipeline:
//! - `codec` decodes the AdmissionReview body
//! - `policies` evaluates the admitted object
//! - `codec` encodes the verdict back into an AdmissionReview
//!
//! `server` exposes the pipeline over HTTP(S).

pub mod codec;
pub mod policies;
pub mod review;
mod server;

pub use codec::{AdmissionRequest, AdmissionVerdict};
pub use policies::{Predicate, ValidationEngine};
pub use review::{Decision, Outcome, admit, review};
pub use server::{WebhookState, create_webhook_router, run_webhook_server};
