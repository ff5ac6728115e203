//! Common test utilities and fixtures
//!
//! Every `TestApp` owns a temporary SQLite file and media directory, so
//! tests run against migrated storage without sharing state.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;
use tunehub_core::types::{Gender, NewUser, Role, User};
use tunehub_server::{
    api,
    config::ServerConfig,
    services::{LocalFileStore, Mail, Mailer, MediaKind},
    AppState, ServerError,
};

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "password123";

/// Keeps every message instead of sending it
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }

    /// Raw token from the link in the last message
    pub fn last_token(&self) -> String {
        let mail = self.sent().pop().expect("No mail was sent");
        mail.body
            .lines()
            .find(|line| line.starts_with("http"))
            .and_then(|url| url.rsplit('/').next())
            .expect("Mail has no link")
            .to_string()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &Mail) -> tunehub_server::Result<()> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Fails every delivery
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: &Mail) -> tunehub_server::Result<()> {
        Err(ServerError::Mail("SMTP connection refused".to_string()))
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(&name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_else(|| panic!("Missing header {name}"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    pub media_root: PathBuf,
    _temp_dir: TempDir,
}

pub fn test_config(temp_dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.bcrypt_cost = 4;
    config.storage.database_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
    config.storage.media_root = temp_dir.path().join("media");
    config
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// App whose mail deliveries always fail
    pub async fn with_failing_mailer() -> Self {
        Self::build(Some(Arc::new(FailingMailer))).await
    }

    async fn build(mailer_override: Option<Arc<dyn Mailer>>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&temp_dir);

        let pool = tunehub_storage::create_pool(&config.storage.database_url)
            .await
            .expect("Failed to create pool");
        tunehub_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let media_root = config.storage.media_root.clone();
        let file_store = LocalFileStore::new(media_root.clone());
        file_store.initialize().await.expect("Failed to create media dirs");

        let mailer = Arc::new(RecordingMailer::default());
        let state_mailer: Arc<dyn Mailer> = match mailer_override {
            Some(mailer) => mailer,
            None => mailer.clone(),
        };

        let state = AppState::new(config, pool, Arc::new(file_store), state_mailer);
        let router = api::router(state.clone());

        Self {
            router,
            state,
            mailer,
            media_root,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.state.pool
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::PATCH, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, token, None)).await
    }

    /// Create a verified account and a session token for it
    pub async fn user(&self, email: &str, role: Role) -> (User, String) {
        let new_user = NewUser {
            name: "Test User".to_string(),
            age: 30,
            gender: Gender::Other,
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            role,
        };
        let hash = self.state.auth_service.hash_password(TEST_PASSWORD).unwrap();
        let user = tunehub_storage::users::create(self.pool(), &new_user, &hash, None)
            .await
            .expect("Failed to create test user");
        let token = self.state.auth_service.create_token(&user.id).unwrap();
        (user, token)
    }

    pub async fn admin(&self) -> (User, String) {
        self.user("admin@example.com", Role::Admin).await
    }

    pub async fn write_media(&self, kind: MediaKind, name: &str, data: &[u8]) {
        let path = self.media_root.join(kind.subdirectory()).join(name);
        tokio::fs::write(path, data).await.expect("Failed to write media file");
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
