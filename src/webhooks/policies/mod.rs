//! Validation policies for admitted objects.
//!
//! Each policy is a [`Predicate`]: an independent, stateless check that
//! either passes or explains why the object is rejected. The
//! [`ValidationEngine`] runs its predicates in order and stops at the
//! first rejection.
//!
//! Policies:
//! - `required_label`: the object must carry an `owner` label

pub mod required_label;

pub use required_label::RequiredLabel;

use tracing::debug;

use crate::error::Rejection;
use crate::webhooks::codec::{AdmissionRequest, AdmissionVerdict};

/// Message returned when every predicate passes
pub const VALIDATION_SUCCESSFUL: &str = "Validation successful";

/// A single must-pass validation rule
pub trait Predicate: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Check the request, returning why it is rejected if it is
    fn check(&self, request: &AdmissionRequest) -> Result<(), Rejection>;
}

/// Ordered set of predicates evaluated against each request
pub struct ValidationEngine {
    predicates: Vec<Box<dyn Predicate>>,
}

impl Default for ValidationEngine {
    /// The production rule set: a required `owner` label
    fn default() -> Self {
        Self::new(vec![Box::new(RequiredLabel::owner())])
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.predicates.iter().map(|p| p.name()))
            .finish()
    }
}

impl ValidationEngine {
    /// Create an engine evaluating `predicates` in the given order
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self { predicates }
    }

    /// Names of the configured predicates, in evaluation order
    pub fn predicate_names(&self) -> Vec<&'static str> {
        self.predicates.iter().map(|p| p.name()).collect()
    }

    /// Evaluate all predicates against `request`.
    ///
    /// Always produces a verdict carrying the request's uid. The first
    /// rejecting predicate decides the message.
    pub fn evaluate(&self, request: &AdmissionRequest) -> AdmissionVerdict {
        for predicate in &self.predicates {
            if let Err(rejection) = predicate.check(request) {
                debug!(
                    uid = %request.uid,
                    predicate = predicate.name(),
                    fault = rejection.is_fault(),
                    "Predicate rejected request"
                );
                return AdmissionVerdict::denied(&request.uid, rejection.to_string());
            }
        }

        AdmissionVerdict::allowed(&request.uid, VALIDATION_SUCCESSFUL)
    }
}
