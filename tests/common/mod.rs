// Shared helpers for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use exercises_api::api::routes::create_routes;
use exercises_api::auth::JwtService;
use exercises_api::store::InMemoryExerciseStore;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryExerciseStore>,
    token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryExerciseStore::new());
        let router = create_routes(store.clone(), TEST_JWT_SECRET);
        let token = JwtService::new(TEST_JWT_SECRET)
            .create_access_token("athlete-1", "athlete@example.com")
            .expect("token");

        Self {
            router,
            store,
            token,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Send an authenticated request.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with(method, uri, body, Some(self.bearer())).await
    }

    /// Send a request without credentials.
    pub async fn send_anonymous(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with(method, uri, body, None).await
    }

    pub async fn send_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }
}
