//! End-to-end admission scenarios.

use crate::fixtures::{response_of, review_body, run, run_raw};
use serde_json::json;

// ============================================================================
// Exact wire scenarios
// ============================================================================

#[test]
fn test_owner_present_exact_response() {
    let output = run_raw(
        br#"{"request":{"uid":"abc-123","object":{"metadata":{"labels":{"owner":"team-a"}}}}}"#,
    );
    assert_eq!(
        output,
        r#"{"apiVersion":"admission.k8s.io/v1","kind":"AdmissionReview","response":{"uid":"abc-123","allowed":true,"status":{"message":"Validation successful"}}}"#
    );
}

#[test]
fn test_empty_labels_denied() {
    let review = run(br#"{"request":{"uid":"xyz-9","object":{"metadata":{"labels":{}}}}}"#);
    let response = response_of(&review);

    assert_eq!(response["uid"], "xyz-9");
    assert_eq!(response["allowed"], false);
    assert_eq!(response["status"]["message"], "Missing required label: 'owner'");
}

#[test]
fn test_missing_request_key_denied() {
    let review = run(b"{}");
    let response = response_of(&review);

    assert_eq!(response["uid"], "");
    assert_eq!(response["allowed"], false);
    assert_eq!(response["status"]["message"], "Missing required label: 'owner'");
}

// ============================================================================
// Realistic AdmissionReview bodies
// ============================================================================

#[test]
fn test_full_review_with_owner_allowed() {
    let review = run(&review_body("6f2c-1", json!({"owner": "payments", "app": "api"})));
    let response = response_of(&review);

    assert_eq!(response["uid"], "6f2c-1");
    assert_eq!(response["allowed"], true);
    assert_eq!(response["status"]["message"], "Validation successful");
}

#[test]
fn test_full_review_with_empty_owner_allowed() {
    let review = run(&review_body("6f2c-2", json!({"owner": ""})));
    assert_eq!(response_of(&review)["allowed"], true);
}

#[test]
fn test_full_review_without_owner_denied() {
    let review = run(&review_body("6f2c-3", json!({"app": "api"})));
    let response = response_of(&review);

    assert_eq!(response["uid"], "6f2c-3");
    assert_eq!(response["allowed"], false);
    assert_eq!(response["status"]["message"], "Missing required label: 'owner'");
}

#[test]
fn test_full_review_with_null_labels_denied() {
    let review = run(&review_body("6f2c-4", json!(null)));
    assert_eq!(response_of(&review)["allowed"], false);
}

#[test]
fn test_response_has_no_extra_fields() {
    let review = run(&review_body("6f2c-5", json!({"owner": "x"})));
    assert_eq!(review.as_object().unwrap().len(), 3);
    let response = response_of(&review);
    assert_eq!(response.as_object().unwrap().len(), 3);
    assert_eq!(response["status"].as_object().unwrap().len(), 1);
}

// ============================================================================
// Fail-closed behavior
// ============================================================================

#[test]
fn test_non_json_denied() {
    let review = run(b"<html>not an admission review</html>");
    let response = response_of(&review);

    assert_eq!(response["uid"], "");
    assert_eq!(response["allowed"], false);
    assert!(
        response["status"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to decode AdmissionReview: ")
    );
}

#[test]
fn test_wrong_uid_type_denied_with_empty_uid() {
    let review = run(br#"{"request":{"uid":123,"object":{"metadata":{"labels":{"owner":"a"}}}}}"#);
    let response = response_of(&review);

    assert_eq!(response["uid"], "");
    assert_eq!(response["allowed"], false);
}

#[test]
fn test_malformed_labels_keep_uid() {
    let review = run(br#"{"request":{"uid":"keep","object":{"metadata":{"labels":{"owner":1}}}}}"#);
    let response = response_of(&review);

    assert_eq!(response["uid"], "keep");
    assert_eq!(response["allowed"], false);
    assert!(
        response["status"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Error during validation: ")
    );
}

#[test]
fn test_uid_with_special_characters_round_trips() {
    let uid = "uid \"quoted\" \\ ünïcödé \u{1F600}";
    let review = run(&review_body(uid, json!({"owner": "a"})));
    assert_eq!(response_of(&review)["uid"], uid);
}
