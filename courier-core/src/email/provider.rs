//! Email provider trait and error types

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

/// Email provider error types
#[derive(Error, Debug)]
pub enum EmailProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// A serialized MIME message plus its envelope addressing
///
/// `from` duplicates the message's From header at the envelope level.
/// Recipients are passed separately so Bcc never has to appear in `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEmail {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub data: Vec<u8>,
}

/// Provider verdict for one submitted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub message_id: Option<String>,
}

impl ProviderResponse {
    pub fn accepted(message_id: Option<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message_id,
        }
    }

    pub fn rejected(status: StatusCode) -> Self {
        Self {
            status,
            message_id: None,
        }
    }
}

/// Trait for email providers that accept raw MIME messages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Submit a serialized message
    ///
    /// A provider that answered with a non-success status returns
    /// `Ok` carrying that status; `Err` means no usable answer was received.
    async fn send_raw(&self, email: &RawEmail) -> Result<ProviderResponse, EmailProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
