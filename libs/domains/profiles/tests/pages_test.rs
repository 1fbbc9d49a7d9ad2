//! Tests for the server-rendered profile pages

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_profiles::*;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn app() -> (Router, ProfileService<InMemoryProfileRepository>) {
    let service = ProfileService::new(InMemoryProfileRepository::new());
    (pages::router(service.clone()).unwrap(), service)
}

async fn html_body(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, html_body(response.into_body()).await)
}

async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
    let response = app.clone().oneshot(form_request(uri, body)).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    (status, location, html_body(response.into_body()).await)
}

#[tokio::test]
async fn test_register_redirects_and_lists_profile() {
    let (app, _) = app();

    let (status, location, _) = post_form(
        &app,
        "/register",
        "fullname=Ada+Lovelace&email=Ada%40Example.com&age=36&bio=",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?notice=created"));

    let (status, html) = get_page(&app, "/?notice=created").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Profile created successfully."));
    assert!(html.contains("Ada Lovelace"));
    assert!(html.contains("ada@example.com"));
}

#[tokio::test]
async fn test_register_blank_age_and_bio_are_absent() {
    let (app, service) = app();

    let (status, location, _) =
        post_form(&app, "/register", "fullname=Ada&email=ada%40example.com&age=++&bio=").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?notice=created"));

    let user = service.get_profile(1).await.unwrap();
    assert_eq!(user.age, None);
    assert_eq!(user.bio, None);
}

#[tokio::test]
async fn test_register_escapes_user_content() {
    let (app, _) = app();
    post_form(
        &app,
        "/register",
        "fullname=%3Cscript%3Ealert(1)%3C%2Fscript%3E&email=ada%40example.com",
    )
    .await;

    let (_, html) = get_page(&app, "/").await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn test_register_form_renders() {
    let (app, _) = app();
    let (status, html) = get_page(&app, "/register").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"action="/register""#));
}

#[tokio::test]
async fn test_register_shows_inline_errors() {
    let (app, service) = app();

    let (status, _, html) =
        post_form(&app, "/register", "fullname=&email=nope&age=5&bio=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This field is required."));
    assert!(html.contains("Invalid email address."));
    assert!(html.contains("Number must be between 10 and 120."));
    // Submitted values are kept
    assert!(html.contains(r#"value="nope""#));

    assert!(service.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_non_numeric_age() {
    let (app, _) = app();
    let (status, _, html) =
        post_form(&app, "/register", "fullname=Ada&email=ada%40example.com&age=ten").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Not a valid integer value."));
}

#[tokio::test]
async fn test_register_duplicate_email_flashes() {
    let (app, service) = app();
    post_form(&app, "/register", "fullname=Ada&email=ada%40example.com").await;

    let (status, _, html) =
        post_form(&app, "/register", "fullname=Other&email=ADA%40example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Email already registered."));
    assert_eq!(service.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_page_is_prefilled() {
    let (app, _) = app();
    post_form(&app, "/register", "fullname=Ada&email=ada%40example.com&age=36&bio=Maths").await;

    let (status, html) = get_page(&app, "/update/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"value="ada@example.com""#));
    assert!(html.contains(r#"value="36""#));
    assert!(html.contains(">Maths</textarea>"));
}

#[tokio::test]
async fn test_update_redirects_with_notice() {
    let (app, service) = app();
    post_form(&app, "/register", "fullname=Ada&email=ada%40example.com").await;

    let (status, location, _) =
        post_form(&app, "/update/1", "fullname=Ada+King&email=ada%40example.com&age=40").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?notice=updated"));

    let user = service.get_profile(1).await.unwrap();
    assert_eq!(user.fullname, "Ada King");
    assert_eq!(user.age, Some(40));

    let (_, html) = get_page(&app, "/?notice=updated").await;
    assert!(html.contains("Profile updated."));
}

#[tokio::test]
async fn test_update_to_taken_email_flashes() {
    let (app, service) = app();
    post_form(&app, "/register", "fullname=Ada&email=ada%40example.com").await;
    post_form(&app, "/register", "fullname=Alan&email=alan%40example.com").await;

    let (status, _, html) =
        post_form(&app, "/update/2", "fullname=Alan&email=ada%40example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Email already registered by another user."));
    assert_eq!(service.get_profile(2).await.unwrap().email, "alan@example.com");
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let (app, _) = app();

    for uri in ["/update/7", "/update/seven"] {
        let (status, _) = get_page(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _, _) =
        post_form(&app, "/update/7", "fullname=Ada&email=ada%40example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
