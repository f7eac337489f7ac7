//! Test helpers for integration tests
//!
//! Provides an in-process application, token minting and request helpers.

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use vidshare_api::{create_app, AppState};
use vidshare_common::JwtService;
use vidshare_core::testing::MemoryBackend;
use vidshare_core::Snowflake;

/// Secret shared by the app under test and the token minting helper
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Application under test with direct access to its stores
pub struct TestApp {
    pub backend: MemoryBackend,
    app: Router,
    jwt: JwtService,
}

/// Status, headers and decoded JSON body (`Value::Null` when empty)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let backend = MemoryBackend::new();
        let app = create_app(AppState::memory(&backend, TEST_JWT_SECRET));
        Self {
            backend,
            app,
            jwt: JwtService::new(TEST_JWT_SECRET, 3600),
        }
    }

    /// Access token for a user
    pub fn token_for(&self, user_id: Snowflake) -> String {
        self.jwt
            .issue_access_token(user_id, None)
            .expect("token encoding")
    }

    /// Access token bound to a named session
    pub fn session_token(&self, user_id: Snowflake, session_id: &str) -> String {
        self.jwt
            .issue_access_token(user_id, Some(session_id.to_string()))
            .expect("token encoding")
    }

    /// Send a request through the full middleware stack
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, token, None)
            .await
            .expect("request failed")
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.request(Method::POST, path, token, body)
            .await
            .expect("request failed")
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.request(Method::PUT, path, token, body)
            .await
            .expect("request failed")
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, path, token, Some(body))
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, path, token, None)
            .await
            .expect("request failed")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert the status, printing the body on mismatch
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "unexpected status, body: {}",
        response.body
    );
}

/// Assert an error response with the given status and code
pub fn assert_error(response: &TestResponse, expected: StatusCode, code: &str) {
    assert_status(response, expected);
    assert_eq!(response.body["error"]["code"], code, "body: {}", response.body);
}
