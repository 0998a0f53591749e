//! AdmissionReview envelope codec.
//!
//! Decodes the subset of an `admission.k8s.io/v1` AdmissionReview request
//! that the webhook consumes and encodes verdicts into the fixed response
//! envelope the API server expects.
//!
//! Decoding is deliberately tolerant: every level of the request may be
//! missing or `null`. The admitted object is kept untyped until a policy
//! asks for its labels, so a badly shaped object still produces a verdict
//! that carries the request's uid.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, EncodeError, EvaluationError};

/// API version of the response envelope
pub const API_VERSION: &str = "admission.k8s.io/v1";
/// Kind of the response envelope
pub const KIND: &str = "AdmissionReview";

/// The decoded admission request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionRequest {
    /// Correlation token echoed back in the response. Empty if absent.
    pub uid: String,
    /// The object pending admission, if any
    pub object: Option<Value>,
    /// Operation (CREATE, UPDATE, ...), for logging only
    pub operation: Option<String>,
    /// Kind of the admitted object, for logging only
    pub kind: Option<String>,
    /// Namespace of the admitted object, for logging only
    pub namespace: Option<String>,
    /// Name of the admitted object, for logging only
    pub name: Option<String>,
}

impl AdmissionRequest {
    /// Labels of the admitted object.
    ///
    /// A missing object, metadata or labels map yields an empty map. Labels
    /// that are not a string-to-string map are an error; other metadata
    /// fields are not inspected.
    pub fn labels(&self) -> Result<BTreeMap<String, String>, EvaluationError> {
        let Some(object) = &self.object else {
            return Ok(BTreeMap::new());
        };
        let header = ObjectHeader::deserialize(object)?;
        Ok(header
            .metadata
            .and_then(|metadata| metadata.labels)
            .unwrap_or_default())
    }
}

/// Outcome of evaluating a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionVerdict {
    /// Request uid, copied verbatim
    pub uid: String,
    /// Whether the object is admitted
    pub allowed: bool,
    /// Human-readable reason, surfaced to the user as `status.message`
    pub message: String,
}

impl AdmissionVerdict {
    /// Create an allowing verdict
    pub fn allowed(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            allowed: true,
            message: message.into(),
        }
    }

    /// Create a denying verdict
    pub fn denied(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            allowed: false,
            message: message.into(),
        }
    }
}

/// Decode a request body into an [`AdmissionRequest`].
///
/// Fails only on malformed JSON, a non-object envelope or a non-string uid.
pub fn decode(body: &[u8]) -> Result<AdmissionRequest, DecodeError> {
    let review: ReviewIn = serde_json::from_slice(body)?;
    let request = review.request.unwrap_or_default();
    Ok(AdmissionRequest {
        uid: request.uid.unwrap_or_default(),
        object: request.object,
        operation: request.operation,
        kind: request.kind,
        namespace: request.namespace,
        name: request.name,
    })
}

/// Encode a verdict into the AdmissionReview response envelope
pub fn encode(verdict: &AdmissionVerdict) -> Result<Vec<u8>, EncodeError> {
    let review = ReviewOut {
        api_version: API_VERSION,
        kind: KIND,
        response: ResponseOut {
            uid: &verdict.uid,
            allowed: verdict.allowed,
            status: StatusOut {
                message: &verdict.message,
            },
        },
    };
    Ok(serde_json::to_vec(&review)?)
}

#[derive(Deserialize, Default)]
struct ReviewIn {
    #[serde(default)]
    request: Option<RequestIn>,
}

#[derive(Deserialize, Default)]
struct RequestIn {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    object: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    operation: Option<String>,
    #[serde(default, deserialize_with = "lenient_kind")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct ObjectHeader {
    #[serde(default)]
    metadata: Option<LabelsOnly>,
}

#[derive(Deserialize, Default)]
struct LabelsOnly {
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewOut<'a> {
    api_version: &'static str,
    kind: &'static str,
    response: ResponseOut<'a>,
}

#[derive(Serialize)]
struct ResponseOut<'a> {
    uid: &'a str,
    allowed: bool,
    status: StatusOut<'a>,
}

#[derive(Serialize)]
struct StatusOut<'a> {
    message: &'a str,
}

/// Logging-only fields must never fail a decode
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// `request.kind` is a GroupVersionKind; keep only its `kind`
fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(|gvk| gvk.get("kind"))
        .and_then(Value::as_str)
        .map(str::to_owned))
}
