//! AWS SES email provider implementation
//!
//! Submits pre-built MIME messages through the SES v2 `SendEmail` API using
//! raw content. The client is constructed once at startup and injected.

use super::provider::{EmailProvider, EmailProviderError, ProviderResponse, RawEmail};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sesv2::{
    error::{DisplayErrorContext, SdkError},
    primitives::Blob,
    types::{Destination, EmailContent, RawMessage},
    Client,
};
use axum::http::StatusCode;
use tracing::debug;

/// AWS SES email provider
///
/// Supports:
/// - Static, profile or default-chain credentials (via the shared `SdkConfig`)
/// - Custom endpoints such as LocalStack
/// - Configuration sets for tracking
pub struct SesEmailProvider {
    client: Client,
    configuration_set: Option<String>,
}

impl SesEmailProvider {
    pub fn new(client: Client, configuration_set: Option<String>) -> Self {
        Self {
            client,
            configuration_set,
        }
    }

    /// Build a client from shared SDK configuration
    pub fn from_sdk_config(sdk_config: &SdkConfig, configuration_set: Option<String>) -> Self {
        Self::new(Client::new(sdk_config), configuration_set)
    }

    fn destination(email: &RawEmail) -> Destination {
        let non_empty = |list: &Vec<String>| (!list.is_empty()).then(|| list.clone());

        Destination::builder()
            .set_to_addresses(non_empty(&email.to))
            .set_cc_addresses(non_empty(&email.cc))
            .set_bcc_addresses(non_empty(&email.bcc))
            .build()
    }
}

#[async_trait]
impl EmailProvider for SesEmailProvider {
    async fn send_raw(&self, email: &RawEmail) -> Result<ProviderResponse, EmailProviderError> {
        let raw_message = RawMessage::builder()
            .data(Blob::new(email.data.clone()))
            .build()
            .map_err(|e| EmailProviderError::InvalidMessage(e.to_string()))?;

        let content = EmailContent::builder().raw(raw_message).build();

        let mut request = self
            .client
            .send_email()
            .from_email_address(&email.from)
            .destination(Self::destination(email))
            .content(content);

        if let Some(config_set) = &self.configuration_set {
            request = request.configuration_set_name(config_set);
        }

        let err = match request.send().await {
            Ok(output) => return Ok(ProviderResponse::accepted(output.message_id)),
            Err(err) => err,
        };

        let message = DisplayErrorContext(&err).to_string();
        match &err {
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                Err(EmailProviderError::ConnectionError(message))
            }
            SdkError::ConstructionFailure(_) => Err(EmailProviderError::InvalidMessage(message)),
            _ if message.contains("InvalidClientTokenId")
                || message.contains("SignatureDoesNotMatch") =>
            {
                Err(EmailProviderError::AuthenticationFailed(message))
            }
            _ => {
                // Service errors with an HTTP response are reported by status
                let status = err
                    .raw_response()
                    .and_then(|raw| StatusCode::from_u16(raw.status().as_u16()).ok());
                match status {
                    Some(status) => {
                        debug!(%status, error = %message, "SES rejected message");
                        Ok(ProviderResponse::rejected(status))
                    }
                    None => Err(EmailProviderError::SendFailed(message)),
                }
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "ses"
    }
}
