// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for owner-label-webhook.
//!
//! Uses proptest to generate random inputs and verify invariants.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::{Value, json};

use owner_label_webhook::webhooks::admit;
use owner_label_webhook::{ValidationEngine, review};

/// Strategy for generating Kubernetes-ish label keys.
fn label_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9./-]{0,20}"
}

/// Strategy for generating label maps that never contain `owner`.
fn labels_without_owner() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(
        label_key().prop_filter("must not be owner", |k| k != "owner"),
        ".{0,16}",
        0..8,
    )
}

fn request(uid: &str, labels: &BTreeMap<String, String>) -> Vec<u8> {
    json!({"request": {"uid": uid, "object": {"metadata": {"labels": labels}}}})
        .to_string()
        .into_bytes()
}

fn run(body: &[u8]) -> Value {
    serde_json::from_slice(&review(&ValidationEngine::default(), body).unwrap()).unwrap()
}

proptest! {
    /// Property: An `owner` key is sufficient, whatever its value.
    #[test]
    fn test_owner_key_allows(
        uid in ".{0,40}",
        mut labels in labels_without_owner(),
        owner in ".{0,16}",
    ) {
        labels.insert("owner".to_string(), owner);
        let review = run(&request(&uid, &labels));
        let response = &review["response"];
        prop_assert_eq!(&response["allowed"], &json!(true));
        prop_assert_eq!(&response["status"]["message"], &json!("Validation successful"));
    }

    /// Property: Without `owner` the request is denied with a fixed message.
    #[test]
    fn test_missing_owner_denies(uid in ".{0,40}", labels in labels_without_owner()) {
        let review = run(&request(&uid, &labels));
        let response = &review["response"];
        prop_assert_eq!(&response["allowed"], &json!(false));
        prop_assert_eq!(
            &response["status"]["message"],
            &json!("Missing required label: 'owner'")
        );
    }

    /// Property: The response uid always equals the request uid.
    #[test]
    fn test_uid_echoed(uid in any::<String>(), labels in labels_without_owner()) {
        let review = run(&request(&uid, &labels));
        let response = &review["response"];
        prop_assert_eq!(&response["uid"], &json!(uid));
    }

    /// Property: Arbitrary bytes always yield a well-formed envelope.
    #[test]
    fn test_arbitrary_bytes_never_fail(body in prop::collection::vec(any::<u8>(), 0..256)) {
        let review = run(&body);
        prop_assert_eq!(&review["apiVersion"], &json!("admission.k8s.io/v1"));
        prop_assert_eq!(&review["kind"], &json!("AdmissionReview"));
        prop_assert!(review["response"]["allowed"].is_boolean());
        prop_assert!(review["response"]["status"]["message"].is_string());
    }

    /// Property: Evaluation is deterministic.
    #[test]
    fn test_admit_deterministic(uid in ".{0,20}", labels in labels_without_owner()) {
        let engine = ValidationEngine::default();
        let body = request(&uid, &labels);
        prop_assert_eq!(admit(&engine, &body), admit(&engine, &body));
    }
}
