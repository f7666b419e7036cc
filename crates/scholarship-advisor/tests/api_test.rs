//! REST API 集成测试
//!
//! 直接在内存中驱动 Router，不绑定端口。

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use scholarship_advisor::{Advisor, AppState, RuleBook, routes};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> (Router, RuleBook) {
    let rule_book = RuleBook::with_defaults();
    let app = routes::app(AppState::new(rule_book.clone(), Advisor::default()));
    (app, rule_book)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "scholarship-advisor");
}

#[tokio::test]
async fn test_request_id_header() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_evaluate_top_merit() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/evaluate",
            json!({
                "applicant": {
                    "cgpa": 3.8,
                    "family_income": 6000,
                    "co_curricular_score": 85,
                    "community_service_hours": 30,
                    "current_semester": 5,
                    "disciplinary_actions": 0
                }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["code"], "SUCCESS");

    let data = &body["data"];
    assert_eq!(data["decision"], "AWARD_FULL");
    assert_eq!(data["label"], "AWARD FULL");
    assert_eq!(data["triggeredRule"], "Top merit candidate");
    assert_eq!(data["priority"], 100);
    assert_eq!(data["defaulted"], false);
    assert_eq!(data["matchedFacts"].as_array().unwrap().len(), 4);
    assert_eq!(data["matchedFacts"][0]["field"], "cgpa");
    assert_eq!(data["matchedFacts"][0]["operator"], ">=");
    assert!(data.get("evaluationTrace").is_none());
}

#[tokio::test]
async fn test_evaluate_low_cgpa_beats_need_review() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/evaluate",
            json!({ "applicant": { "cgpa": 2.0, "family_income": 3000 } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["decision"], "REJECT");
    assert_eq!(body["data"]["triggeredRule"], "Low CGPA - not eligible");
}

#[tokio::test]
async fn test_evaluate_default_decision_with_trace() {
    let (app, _) = test_app();
    let (_, body) = send(
        &app,
        post_json(
            "/api/evaluate",
            json!({
                "applicant": { "cgpa": 3.0, "family_income": 10000, "co_curricular_score": 40 },
                "trace": true
            }),
        ),
    )
    .await;

    let data = &body["data"];
    assert_eq!(data["decision"], "REJECT");
    assert_eq!(
        data["reason"],
        "Applicant does not satisfy any scholarship criteria."
    );
    assert_eq!(data["defaulted"], true);
    assert!(data["triggeredRule"].is_null());
    assert_eq!(data["evaluatedRules"], 5);
    assert!(!data["evaluationTrace"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_evaluate_raw_facts_missing_field_fails_closed() {
    let (app, _) = test_app();
    // 缺少 family_income，依赖它的规则都不成立
    let (_, body) = send(
        &app,
        post_json(
            "/api/evaluate",
            json!({ "facts": { "cgpa": 3.9, "co_curricular_score": 95, "disciplinary_actions": 0 } }),
        ),
    )
    .await;

    assert_eq!(body["data"]["decision"], "REJECT");
    assert_eq!(body["data"]["defaulted"], true);
}

#[tokio::test]
async fn test_evaluate_with_inline_rules_does_not_replace_current() {
    let (app, rule_book) = test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/evaluate",
            json!({
                "facts": { "research_papers": 3 },
                "rules": [{
                    "name": "Research grant",
                    "priority": 10,
                    "conditions": [["research_papers", ">=", "2"]],
                    "action": { "decision": "RESEARCH_GRANT", "reason": "Published researcher" }
                }]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["decision"], "RESEARCH_GRANT");
    assert_eq!(body["data"]["label"], "RESEARCH GRANT");
    assert_eq!(rule_book.current().len(), 5);
}

#[tokio::test]
async fn test_evaluate_validation_error() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        post_json("/api/evaluate", json!({ "applicant": { "cgpa": 5.0 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_evaluate_requires_input() {
    let (app, _) = test_app();
    let (status, body) = send(&app, post_json("/api/evaluate", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_evaluate_invalid_inline_rules() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/evaluate",
            json!({ "facts": {}, "rules": [{ "name": "no action" }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RULE_JSON");
}

#[tokio::test]
async fn test_get_rules() {
    let (app, _) = test_app();
    let (status, body) = send(
        &app,
        Request::builder().uri("/api/rules").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["count"], 5);
    assert!(data["source"].is_null());
    assert_eq!(data["rules"][0]["name"], "Top merit candidate");
    assert_eq!(data["rules"][0]["conditions"][0], json!(["cgpa", ">=", 3.7]));
    let fields: Vec<&str> = data["requiredFields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec![
            "cgpa",
            "co_curricular_score",
            "disciplinary_actions",
            "family_income"
        ]
    );
}

#[tokio::test]
async fn test_replace_and_reset_rules() {
    let (app, rule_book) = test_app();

    let new_rules = json!([{
        "name": "Everyone reviewed",
        "priority": 1,
        "conditions": [],
        "action": { "decision": "REVIEW", "reason": "Manual review" }
    }]);
    let (status, body) = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri("/api/rules")
            .body(Body::from(new_rules.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(rule_book.current().len(), 1);

    let (_, body) = send(&app, post_json("/api/evaluate", json!({ "facts": {} }))).await;
    assert_eq!(body["data"]["decision"], "REVIEW");
    assert_eq!(body["data"]["triggeredRule"], "Everyone reviewed");

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/rules/reset")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 5);
    assert_eq!(rule_book.current().len(), 5);
}

#[tokio::test]
async fn test_replace_rules_rejects_malformed_json() {
    let (app, rule_book) = test_app();

    for body in ["{ not json", r#"{"name": "object, not array"}"#] {
        let (status, json) = send(
            &app,
            Request::builder()
                .method("PUT")
                .uri("/api/rules")
                .body(Body::from(body))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["code"], "INVALID_RULE_JSON");
    }

    assert_eq!(rule_book.current().len(), 5);
}
