//! Required label policy.
//!
//! Validates:
//! - The admitted object carries a given label key in `metadata.labels`
//!
//! Only key presence is checked; an empty value passes.

use super::Predicate;
use crate::error::Rejection;
use crate::webhooks::codec::AdmissionRequest;

/// Label every admitted object must carry
pub const OWNER_LABEL: &str = "owner";

/// Require a label key to be present
#[derive(Debug, Clone)]
pub struct RequiredLabel {
    key: &'static str,
}

impl RequiredLabel {
    /// Require the `owner` label
    pub fn owner() -> Self {
        Self { key: OWNER_LABEL }
    }
}

impl Predicate for RequiredLabel {
    fn name(&self) -> &'static str {
        "required-label"
    }

    fn check(&self, request: &AdmissionRequest) -> Result<(), Rejection> {
        let labels = request.labels()?;
        if labels.contains_key(self.key) {
            return Ok(());
        }

        Err(Rejection::denied(format!(
            "Missing required label: '{}'",
            self.key
        )))
    }
}
