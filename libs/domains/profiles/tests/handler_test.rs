//! Handler tests for the profiles JSON API
//!
//! These run the domain router against the in-memory repository and check
//! status codes and response bodies end to end.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_profiles::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = ProfileService::new(InMemoryProfileRepository::new());
    handlers::router(service)
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

#[tokio::test]
async fn test_create_list_update_scenario() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/",
            json!({"fullname": "Ada Lovelace", "email": "Ada@Example.com", "age": 36}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "message": "created"}));

    let (status, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        users,
        json!([{
            "id": 1,
            "fullname": "Ada Lovelace",
            "email": "ada@example.com",
            "age": 36,
            "bio": null
        }])
    );

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/1",
            json!({"fullname": "Ada King", "email": "ada@example.com", "bio": "Analyst"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "message": "updated"}));

    let (_, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(users[0]["fullname"], "Ada King");
    assert_eq!(users[0]["age"], Value::Null);
    assert_eq!(users[0]["bio"], "Analyst");
}

#[tokio::test]
async fn test_create_reports_first_failing_field() {
    let app = app();

    let cases = [
        (json!({"email": "ada@example.com"}), "fullname required"),
        (json!({"fullname": "Ada", "email": ""}), "email required"),
        (json!({"fullname": "Ada", "email": "not-an-email"}), "invalid email"),
        (
            json!({"fullname": "Ada", "email": "ada@example.com", "age": "old"}),
            "age must be an integer",
        ),
        (
            json!({"fullname": "Ada", "email": "ada@example.com", "age": 200}),
            "age out of range",
        ),
        (json!({"age": 5}), "fullname required"),
        (
            json!({"fullname": "Ada", "email": "ada@example.com", "age": ""}),
            "age must be an integer",
        ),
        (
            json!({"fullname": "Ada", "email": "ada@example.com", "age": "99999999999999999999"}),
            "age out of range",
        ),
    ];

    for (payload, expected) in cases {
        let (status, body) = send(&app, json_request("POST", "/", payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["error"], expected, "{payload}");
    }

    let (_, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_blank_age_string_is_rejected() {
    let app = app();

    for age in ["", "   "] {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/",
                json!({"fullname": "Ada", "email": "ada@example.com", "age": age}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{age:?}");
        assert_eq!(body, json!({"error": "age must be an integer"}), "{age:?}");
    }

    let (_, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_invalid_email_includes_message() {
    let app = app();
    let (_, body) = send(
        &app,
        json_request("POST", "/", json!({"fullname": "Ada", "email": "ada.example.com"})),
    )
    .await;
    assert_eq!(body["error"], "invalid email");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_treated_as_empty() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "fullname required"}));
}

#[tokio::test]
async fn test_non_json_content_type_is_415() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"fullname":"Ada","email":"ada@example.com"}"#))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (_, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_duplicate_email_is_case_insensitive() {
    let app = app();
    let payload = json!({"fullname": "Ada", "email": "ada@example.com"});
    let (status, _) = send(&app, json_request("POST", "/", payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        json_request("POST", "/", json!({"fullname": "Other", "email": "ADA@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "email already registered"}));

    let (_, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_to_another_users_email() {
    let app = app();
    for (name, email) in [("Ada", "ada@example.com"), ("Alan", "alan@example.com")] {
        let (status, _) = send(
            &app,
            json_request("POST", "/", json!({"fullname": name, "email": email})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        json_request("PUT", "/2", json!({"fullname": "Alan", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "email already registered by another user"}));

    let (_, users) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(users[1]["email"], "alan@example.com");
}

#[tokio::test]
async fn test_update_keeping_own_email() {
    let app = app();
    send(
        &app,
        json_request("POST", "/", json!({"fullname": "Ada", "email": "ada@example.com"})),
    )
    .await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/1",
            json!({"fullname": "Ada", "email": "ADA@example.com", "age": "40"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_unknown_or_malformed_id_is_404() {
    let app = app();

    for uri in ["/99", "/abc"] {
        let (status, body) = send(
            &app,
            json_request("PUT", uri, json!({"fullname": "Ada", "email": "ada@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "not found", "{uri}");
    }
}
