//! Shared setup for the HTTP integration tests: an in-memory database, the real
//! router, and an email service that keeps every login link it is asked to send.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use liftlink::{
    build_router,
    config::{JwtConfig, ServerConfig},
    services::{EmailError, EmailService},
    test_utils::test_helpers,
    AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // for `oneshot`

#[derive(Debug, Clone)]
pub struct SentLink {
    pub to: String,
    pub url: String,
}

impl SentLink {
    pub fn token(&self) -> String {
        self.url
            .split("token=")
            .nth(1)
            .expect("link should carry a token")
            .to_string()
    }
}

#[derive(Clone, Default)]
pub struct Outbox(Arc<Mutex<Vec<SentLink>>>);

impl Outbox {
    pub fn last_for(&self, email: &str) -> SentLink {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|l| l.to == email)
            .cloned()
            .expect("a link should have been sent")
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailService for Outbox {
    async fn send_magic_link(
        &self,
        to_email: &str,
        link_url: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), EmailError> {
        self.0.lock().unwrap().push(SentLink {
            to: to_email.to_string(),
            url: link_url.to_string(),
        });
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub outbox: Outbox,
}

pub async fn spawn_app() -> TestApp {
    let pool = test_helpers::create_test_db()
        .await
        .expect("Failed to create test database");
    let outbox = Outbox::default();
    let config = ServerConfig::default();

    let state = AppState::new(
        pool.clone(),
        &JwtConfig::from_secret(b"integration-test-secret"),
        Box::new(outbox.clone()),
        &config.frontend_url,
    );
    let router = build_router(state, &config).expect("router should build");

    TestApp {
        router,
        pool,
        outbox,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Requests a login link for `email` and returns the emailed token.
    pub async fn request_link(&self, email: &str, remember_me: bool) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/magic-link",
                None,
                Some(serde_json::json!({ "email": email, "rememberMe": remember_me })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "magic link request failed: {}", body);
        self.outbox.last_for(&email.trim().to_lowercase()).token()
    }

    /// Runs the whole magic-link login and returns the session body.
    pub async fn login_with(&self, email: &str, remember_me: bool) -> Value {
        let link_token = self.request_link(email, remember_me).await;
        let (status, body) = self
            .request(
                Method::GET,
                &format!("/auth/verify?token={}", link_token),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "verify failed: {}", body);
        body["data"].clone()
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self, email: &str) -> String {
        self.login_with(email, false).await["token"]
            .as_str()
            .expect("session token")
            .to_string()
    }
}
