//! Integration tests for the FieldProof API
//!
//! Handlers run against an in-memory sqlite store and a scripted
//! inference client, through the real router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

use crate::inference::{InferenceError, MockInference};
use crate::router;
use crate::state::AppState;

async fn test_state(responses: Vec<Result<Value, InferenceError>>) -> Arc<AppState> {
    // Named shared-cache database so every pooled connection sees the
    // same in-memory store.
    let database_url = format!(
        "sqlite:file:test-{}?mode=memory&cache=shared",
        Uuid::new_v4()
    );
    let inference = Arc::new(MockInference::with_responses(responses));
    Arc::new(
        AppState::new(Some(database_url), inference)
            .await
            .expect("test state"),
    )
}

async fn request(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn findings_payload() -> Value {
    json!({
        "violations": [
            {
                "description": "Missing GFCI protection at sink receptacle",
                "codeSection": "NEC 210.8(A)(7)",
                "severity": "critical",
                "fixInstruction": "Install a GFCI receptacle"
            },
            {
                "description": "Loose wire nut at junction box",
                "codeSection": "NEC 110.14",
                "severity": "minor",
                "fixInstruction": "Re-terminate the splice"
            }
        ],
        "correctItems": ["Cable properly stapled"],
        "skillsDemonstrated": [
            {"skill": "rough-in wiring", "evidence": "clean runs"}
        ],
        "complianceScore": 58,
        "isCompliant": false,
        "overallAssessment": "Solid rough-in with one critical gap."
    })
}

fn analyze_body() -> Value {
    json!({
        "image": "photo://before",
        "workType": "electrical",
        "userDescription": "Kitchen receptacle rough-in",
        "jurisdiction": "FL"
    })
}

#[tokio::test]
async fn test_health() {
    let state = test_state(vec![]).await;
    let (status, body) = request(router(state), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "fieldproof-api");
}

#[tokio::test]
async fn test_analyze_creates_analysis() {
    let state = test_state(vec![Ok(findings_payload())]).await;
    let app = router(state.clone());

    let (status, body) = request(app, "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "single");
    assert_eq!(body["workType"], "electrical");
    assert_eq!(body["complianceScore"], 58);
    // Critical violation present: derived compliance must be false even
    // though this payload also says false (see dedicated test below).
    assert_eq!(body["isCompliant"], false);
    assert!(body["id"].as_str().is_some());

    let (status, list) = request(router(state), "GET", "/api/analyses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_analyze_overrides_upstream_compliance_claim() {
    let mut payload = findings_payload();
    payload["isCompliant"] = json!(true); // upstream lies
    let state = test_state(vec![Ok(payload)]).await;

    let (status, body) = request(router(state), "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCompliant"], false);
}

#[tokio::test]
async fn test_analyze_missing_image_is_400() {
    let state = test_state(vec![]).await;
    let (status, body) = request(
        router(state),
        "POST",
        "/api/analyze",
        Some(json!({"workType": "electrical"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_analyze_incomplete_pair_is_400() {
    let state = test_state(vec![]).await;
    let (status, _) = request(
        router(state),
        "POST",
        "/api/analyze",
        Some(json!({"workType": "electrical", "beforeImage": "photo://b"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_upstream_shape_mismatch_is_502() {
    let state = test_state(vec![Ok(json!({"unexpected": "shape"}))]).await;
    let (status, body) = request(router(state), "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_PARSE");
}

#[tokio::test]
async fn test_analyze_upstream_non_json_is_502() {
    let state = test_state(vec![Err(InferenceError::Parse("not json".to_string()))]).await;
    let (status, body) = request(router(state), "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_PARSE");
}

#[tokio::test]
async fn test_analyze_upstream_transport_failure_is_500() {
    let state = test_state(vec![Err(InferenceError::Transport("refused".to_string()))]).await;
    let (status, _) = request(router(state), "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_recheck_merges_into_stored_analysis() {
    let reconciliation = json!({
        "originalViolationStatus": [
            {"originalDescription": "Missing GFCI protection at sink receptacle", "status": "resolved"},
            {"originalDescription": "Loose wire nut at junction box", "status": "resolved"}
        ],
        "newViolationsFound": [],
        "complianceScore": 97,
        "isCompliant": true
    });
    let state = test_state(vec![Ok(findings_payload()), Ok(reconciliation)]).await;

    let (status, created) =
        request(router(state.clone()), "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, recheck) = request(
        router(state.clone()),
        "POST",
        "/api/recheck",
        Some(json!({
            "analysisId": id,
            "originalImage": "photo://before",
            "fixedImage": "photo://after",
            "originalViolations": created["violations"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recheck["isCompliant"], true);
    assert_eq!(recheck["complianceScore"], 97);
    assert_eq!(recheck["originalViolationStatus"].as_array().unwrap().len(), 2);

    // Merged replacement values are visible on the stored record
    let (status, stored) = request(
        router(state),
        "GET",
        &format!("/api/analyses/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["fixVerified"], true);
    assert_eq!(stored["fixComplianceScore"], 97);
    assert_eq!(stored["fixedPhotoUrl"], "photo://after");
    // Original findings untouched by the merge
    assert_eq!(stored["complianceScore"], 58);
}

#[tokio::test]
async fn test_recheck_unknown_analysis_is_404() {
    let state = test_state(vec![]).await;
    let (status, body) = request(
        router(state),
        "POST",
        "/api/recheck",
        Some(json!({
            "analysisId": "no-such-id",
            "originalImage": "photo://b",
            "fixedImage": "photo://a",
            "originalViolations": [
                {
                    "description": "Missing GFCI",
                    "codeSection": "NEC 210.8",
                    "severity": "critical",
                    "fixInstruction": "Install GFCI"
                }
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_recheck_empty_violations_is_400() {
    let state = test_state(vec![]).await;
    let (status, _) = request(
        router(state),
        "POST",
        "/api/recheck",
        Some(json!({
            "originalImage": "photo://b",
            "fixedImage": "photo://a",
            "originalViolations": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_empty_history() {
    let state = test_state(vec![]).await;
    let (status, body) = request(router(state), "GET", "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAnalyses"], 0);
    assert_eq!(body["averageCompliance"], 0);
    assert_eq!(body["trend"], "stable");
    assert!(body["skills"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_credential_requires_profile_then_builds() {
    let state = test_state(vec![Ok(findings_payload())]).await;

    let (status, _) = request(router(state.clone()), "GET", "/api/credential", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        router(state.clone()),
        "PUT",
        "/api/profile",
        Some(json!({
            "name": "Sam Ortiz",
            "trade": "electrician",
            "primaryJurisdiction": "FL"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        request(router(state.clone()), "POST", "/api/analyze", Some(analyze_body())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(router(state), "GET", "/api/credential", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sam Ortiz");
    assert_eq!(body["totalAnalyses"], 1);
    assert_eq!(body["qualifiedJurisdictions"], json!(["FL"]));
    // One skill at score 58: developing, not strong
    assert!(body["strongSkills"].as_array().unwrap().is_empty());
    assert_eq!(body["developingSkills"], json!(["rough-in wiring"]));
}

#[tokio::test]
async fn test_knowledge_query_and_task_filter() {
    let state = test_state(vec![]).await;

    let (status, body) = request(
        router(state.clone()),
        "GET",
        "/api/knowledge?q=gfci",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["clips"][0]["id"], "gfci-wet-locations");

    let (status, body) = request(
        router(state.clone()),
        "GET",
        "/api/knowledge?taskType=plumbing",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    // No query returns the whole corpus
    let (status, body) = request(router(state), "GET", "/api/knowledge", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64().unwrap() as usize, crate::knowledge::builtin_clips().len());
}

#[tokio::test]
async fn test_analysis_clips_for_violations() {
    let state = test_state(vec![Ok(findings_payload())]).await;
    let (_, created) =
        request(router(state.clone()), "POST", "/api/analyze", Some(analyze_body())).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = request(
        router(state),
        "GET",
        &format!("/api/analyses/{}/clips", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // "receptacle" from the violation text matches the GFCI clip triggers
    let ids: Vec<&str> = body["clips"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"gfci-wet-locations"));
}

mod property_tests {
    use crate::models::AnalyzeRequest;
    use proptest::prelude::*;

    fn image_option() -> impl Strategy<Value = Option<String>> {
        prop_oneof![Just(None), "[a-z]{3,12}".prop_map(Some)]
    }

    proptest! {
        /// Property: mode resolution accepts exactly the two contract
        /// shapes and rejects everything else.
        #[test]
        fn mode_resolution_matches_contract(
            image in image_option(),
            before in image_option(),
            after in image_option(),
        ) {
            let req = AnalyzeRequest {
                image: image.clone(),
                before_image: before.clone(),
                after_image: after.clone(),
                work_type: "electrical".to_string(),
                user_description: None,
                jurisdiction: None,
            };
            let valid_single = image.is_some() && before.is_none() && after.is_none();
            let valid_pair = image.is_none() && before.is_some() && after.is_some();
            prop_assert_eq!(req.mode().is_ok(), valid_single || valid_pair);
        }

        /// Property: blank work types never validate
        #[test]
        fn blank_work_type_rejected(spaces in " {0,6}") {
            let req = AnalyzeRequest {
                image: Some("img".to_string()),
                before_image: None,
                after_image: None,
                work_type: spaces,
                user_description: None,
                jurisdiction: None,
            };
            prop_assert!(req.validate().is_err());
        }
    }
}
