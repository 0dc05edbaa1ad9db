mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;
use exercises_api::auth::JwtService;

#[tokio::test]
async fn test_reads_do_not_require_credentials() {
    let app = TestApp::new();
    let (status, created) = app
        .send(Method::POST, "/exercises/", Some(json!({ "name": "Plank" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.send_anonymous(Method::GET, "/exercises/", None).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/exercises/{}/", created["id"]);
    let (status, _) = app.send_anonymous(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_writes_require_credentials() {
    let app = TestApp::new();
    let (_, created) = app
        .send(Method::POST, "/exercises/", Some(json!({ "name": "Plank" })))
        .await;
    let uri = format!("/exercises/{}/", created["id"]);

    let (status, body) = app
        .send_anonymous(Method::POST, "/exercises/", Some(json!({ "name": "Squat" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "detail": "Authentication credentials were not provided." })
    );

    let (status, _) = app
        .send_anonymous(Method::PUT, &uri, Some(json!({ "name": "Side plank" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send_anonymous(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // nothing changed
    let (_, body) = app.send_anonymous(Method::GET, &uri, None).await;
    assert_eq!(body["name"], "Plank");
}

#[tokio::test]
async fn test_authentication_precedes_lookup() {
    let app = TestApp::new();

    let (status, _) = app
        .send_anonymous(Method::DELETE, "/exercises/999/", None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_another_issuer_is_rejected() {
    let app = TestApp::new();
    let foreign = JwtService::new("some-other-secret")
        .create_access_token("intruder", "intruder@example.com")
        .unwrap();

    let (status, body) = app
        .send_with(
            Method::POST,
            "/exercises/",
            Some(json!({ "name": "Squat" })),
            Some(format!("Bearer {foreign}")),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Invalid token." }));
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = TestApp::new();

    let (status, body) = app
        .send_with(
            Method::POST,
            "/exercises/",
            Some(json!({ "name": "Squat" })),
            Some("Token abc".to_string()),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Invalid authorization header format." }));
}
