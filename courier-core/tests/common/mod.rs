//! HTTP test infrastructure
//!
//! `TestAppState` implements `HasServices` with an in-memory file store and a
//! recording provider behind the real MIME transport, so tests drive the
//! production router and handlers without AWS.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use courier_core::config::{AwsConfig, Config, EmailConfig, StorageConfig, TelemetryConfig};
use courier_core::email::{
    EmailProvider, EmailProviderError, MimeTransport, ProviderResponse, RawEmail,
};
use courier_core::server::build_router;
use courier_core::service::EmailService;
use courier_core::state::HasServices;
use courier_core::storage::{FileStore, FileStream, StorageError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const BUCKET: &str = "email-templates";
pub const SENDER: &str = "noreply@example.com";

// ============================================================================
// Test Configuration
// ============================================================================

pub fn create_test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 8080,
        aws: AwsConfig {
            region: "us-east-1".to_string(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            profile: None,
        },
        email: EmailConfig {
            sender: SENDER.to_string(),
            configuration_set: None,
        },
        storage: StorageConfig {
            bucket_name: BUCKET.to_string(),
        },
        telemetry: TelemetryConfig::default(),
        swagger_enabled: true,
    }
}

// ============================================================================
// Test Collaborators
// ============================================================================

/// In-memory object store keyed by (bucket, name)
#[derive(Default)]
pub struct TestFileStore {
    files: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl TestFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, name: &str, content: impl Into<Vec<u8>>) {
        self.files
            .lock()
            .unwrap()
            .insert((BUCKET.to_string(), name.to_string()), content.into());
    }
}

#[async_trait]
impl FileStore for TestFileStore {
    async fn stream_file(&self, name: &str, bucket: &str) -> Result<FileStream, StorageError> {
        let content = self
            .files
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, name)))?;

        Ok(Box::pin(Cursor::new(content)))
    }

    async fn store(
        &self,
        content: Vec<u8>,
        name: &str,
        bucket: &str,
    ) -> Result<String, StorageError> {
        self.files
            .lock()
            .unwrap()
            .insert((bucket.to_string(), name.to_string()), content);
        Ok(name.to_string())
    }

    async fn delete(&self, name: &str, bucket: &str) -> Result<(), StorageError> {
        self.files
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}

/// Provider that records every submitted message and answers with a fixed status
pub struct RecordingProvider {
    sent: Mutex<Vec<RawEmail>>,
    status: Mutex<StatusCode>,
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            status: Mutex::new(StatusCode::OK),
        }
    }
}

impl RecordingProvider {
    pub fn respond_with(&self, status: StatusCode) {
        *self.status.lock().unwrap() = status;
    }

    pub fn sent(&self) -> Vec<RawEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send_raw(&self, email: &RawEmail) -> Result<ProviderResponse, EmailProviderError> {
        let status = *self.status.lock().unwrap();
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());

        Ok(ProviderResponse {
            status,
            message_id: Some(format!("test-message-{}", sent.len())),
        })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

// ============================================================================
// Test AppState
// ============================================================================

pub type TestEmailService = EmailService<TestFileStore, MimeTransport<RecordingProvider>>;

#[derive(Clone)]
pub struct TestAppState {
    pub config: Arc<Config>,
    pub email_service: Arc<TestEmailService>,
    pub prometheus_handle: Option<PrometheusHandle>,
    // Keep references to collaborators for test setup and assertions
    pub store: Arc<TestFileStore>,
    pub provider: Arc<RecordingProvider>,
}

impl TestAppState {
    pub fn new() -> Self {
        Self::with_config(create_test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(TestFileStore::new());
        let provider = Arc::new(RecordingProvider::default());
        let transport = Arc::new(MimeTransport::new(
            provider.clone(),
            config.email.sender.clone(),
        ));
        let email_service = Arc::new(EmailService::new(
            store.clone(),
            transport,
            config.storage.bucket_name.clone(),
        ));

        Self {
            config: Arc::new(config),
            email_service,
            prometheus_handle: None,
            store,
            provider,
        }
    }

    /// Attach a Prometheus handle backed by a recorder that is not installed globally
    pub fn with_metrics(mut self) -> Self {
        self.prometheus_handle = Some(PrometheusBuilder::new().build_recorder().handle());
        self
    }
}

impl HasServices for TestAppState {
    type Store = TestFileStore;
    type Transport = MimeTransport<RecordingProvider>;

    fn config(&self) -> &Config {
        &self.config
    }

    fn email_service(&self) -> &TestEmailService {
        &self.email_service
    }

    fn metrics_handle(&self) -> Option<&PrometheusHandle> {
        self.prometheus_handle.as_ref()
    }
}

/// Build the production router over a test state
pub fn build_test_router(state: TestAppState) -> Router {
    build_router(state)
}

// ============================================================================
// HTTP Test Helpers
// ============================================================================

/// Send a request and return status, headers and raw body
pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    (status, headers, body_bytes.to_vec())
}

/// Make a GET request and return the body as text
pub async fn get_text(app: &Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app, request).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// Make a GET request and parse JSON response
pub async fn get_json<T: DeserializeOwned>(app: &Router, path: &str) -> (StatusCode, Option<T>) {
    let (status, body) = get_text(app, path).await;
    (status, serde_json::from_str(&body).ok())
}

/// Make a POST request with a raw JSON body and parse JSON response
pub async fn post_raw<R: DeserializeOwned>(
    app: &Router,
    path: &str,
    body: &str,
) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).ok())
}

/// Make a POST request with JSON body and parse JSON response
pub async fn post_json<R: DeserializeOwned>(
    app: &Router,
    path: &str,
    body: &serde_json::Value,
) -> (StatusCode, Option<R>) {
    post_raw(app, path, &body.to_string()).await
}
