//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use kiwi_core::db::Database;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        api_keys: vec![],
    };
    create_router_with_options(db, config, Some(AiClient::mock()))
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn sample_tx_body() -> serde_json::Value {
    serde_json::json!({
        "user_id": "user-1",
        "merchant": "Swiggy",
        "amount": 450.0,
        "category": "Food",
        "type": "expense",
        "date": "2024-03-01"
    })
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_create_transaction() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/transactions", sample_tx_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["merchant"], "SWIGGY");
    assert_eq!(json["amount"], 450.0);
    assert_eq!(json["kind"], "expense");
}

#[tokio::test]
async fn test_duplicate_transaction_is_acknowledged() {
    let app = setup_test_app();

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/transactions", sample_tx_body()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request("POST", "/api/transactions", sample_tx_body()))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let json = get_body_json(second).await;
    assert_eq!(json["skipped"], true);
}

#[tokio::test]
async fn test_create_transaction_rejects_invalid_input() {
    let app = setup_test_app();

    let mut body = sample_tx_body();
    body["user_id"] = serde_json::json!("  ");

    let response = app
        .oneshot(json_request("POST", "/api/transactions", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("user_id"));
}

#[tokio::test]
async fn test_list_transactions_newest_first() {
    let app = setup_test_app();

    for (merchant, date) in [("Older", "2024-02-01"), ("Newer", "2024-03-05")] {
        let mut body = sample_tx_body();
        body["merchant"] = serde_json::json!(merchant);
        body["date"] = serde_json::json!(date);
        app.clone()
            .oneshot(json_request("POST", "/api/transactions", body))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/user-1/transactions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["merchant"], "NEWER");
    assert_eq!(list[1]["merchant"], "OLDER");
}

#[tokio::test]
async fn test_list_and_delete_routes_coexist() {
    // Router construction must accept both the listing and delete routes;
    // exercise them back to back on one instance.
    let app = setup_test_app();

    let created = app
        .clone()
        .oneshot(json_request("POST", "/api/transactions", sample_tx_body()))
        .await
        .unwrap();
    let id = get_body_json(created).await["id"].as_i64().unwrap();

    let listed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users/user-1/transactions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(get_body_json(listed).await.as_array().unwrap().len(), 1);

    let deleted = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(get_body_json(deleted).await["deleted"], true);
}

#[tokio::test]
async fn test_delete_transaction_idempotent() {
    let app = setup_test_app();

    let created = app
        .clone()
        .oneshot(json_request("POST", "/api/transactions", sample_tx_body()))
        .await
        .unwrap();
    let id = get_body_json(created).await["id"].as_i64().unwrap();

    let deleted = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(get_body_json(deleted).await["deleted"], true);

    // Second delete reports not_found, still 200
    let again = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::OK);
    let json = get_body_json(again).await;
    assert_eq!(json["deleted"], false);
    assert_eq!(json["not_found"], true);
}

#[tokio::test]
async fn test_sync_transactions() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "transactions": [
            {
                "client_id": "c-1",
                "user_id": "user-1",
                "merchant": "Swiggy",
                "amount": 450.0,
                "category": "Food",
                "type": "expense",
                "date": "2024-03-01"
            },
            {
                "client_id": "c-2",
                "user_id": "user-1",
                "merchant": "Uber",
                "amount": 230.5,
                "category": "Travel",
                "type": "expense",
                "date": "2024-03-02"
            }
        ]
    });

    let response = app
        .oneshot(json_request("POST", "/api/transactions/sync", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["total"], 2);
}

// ========== SMS API Tests ==========

#[tokio::test]
async fn test_analyze_sms() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sms/analyze",
            serde_json::json!({"sms_text": "Rs 450 debited for Swiggy order"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["merchant"], "SWIGGY");
    assert_eq!(json["category"], "Food");
    assert_eq!(json["from_memory"], false);
}

#[tokio::test]
async fn test_analyze_sms_non_transaction() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sms/analyze",
            serde_json::json!({"sms_text": "Your OTP is 482913"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["not_a_transaction"], true);
}

#[tokio::test]
async fn test_analyze_sms_rejects_empty_text() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sms/analyze",
            serde_json::json!({"sms_text": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_sms_unavailable_without_backend() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        api_keys: vec![],
    };
    let app = create_router_with_options(db, config, None);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/sms/analyze",
            serde_json::json!({"sms_text": "Rs 450 debited for Swiggy order"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ========== Rules API Tests ==========

#[tokio::test]
async fn test_rules_learned_via_analysis() {
    let app = setup_test_app();

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/sms/analyze",
            serde_json::json!({"sms_text": "Rs 450 debited for Swiggy order"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/rules")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let rules = json.as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["merchant_name"], "SWIGGY");
    assert_eq!(rules[0]["category"], "Food");
}

#[tokio::test]
async fn test_set_rule_overwrites() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/rules/Swiggy",
            serde_json::json!({"category": "Dining"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["merchant_name"], "SWIGGY");
    assert_eq!(json["category"], "Dining");

    // Subsequent analysis uses the corrected category
    let analysis = app
        .oneshot(json_request(
            "POST",
            "/api/sms/analyze",
            serde_json::json!({"sms_text": "Rs 450 debited for Swiggy order"}),
        ))
        .await
        .unwrap();
    let json = get_body_json(analysis).await;
    assert_eq!(json["category"], "Dining");
    assert_eq!(json["from_memory"], true);
}

// ========== Health and Auth Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["transactions"], 0);
    assert_eq!(json["ai"], "configured");
}

#[tokio::test]
async fn test_auth_required_without_key() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
        api_keys: vec!["secret-key".to_string()],
    };
    let app = create_router_with_options(db, config, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_accepts_valid_key() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
        api_keys: vec!["secret-key".to_string()],
    };
    let app = create_router_with_options(db, config, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("authorization", "Bearer secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_rejects_wrong_key() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
        api_keys: vec!["secret-key".to_string()],
    };
    let app = create_router_with_options(db, config, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("authorization", "Bearer wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
