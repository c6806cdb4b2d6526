//! Email transport: envelope assembly and provider submission
//!
//! Every send variant converges on [`MimeTransport::dispatch`], which builds
//! the MIME message, hands it to the provider and settles the result into a
//! [`DispatchOutcome`]. Nothing here returns an error to the caller.

use super::message::{AttachmentSource, RenderedMessage};
use super::provider::EmailProvider;
use crate::domain::{Attachment, DispatchOutcome, EmailRequest, FileStream};
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Addressing and content shared by every send variant
///
/// Empty cc/bcc lists are not added to the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailEnvelope {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

impl EmailEnvelope {
    pub fn new(to: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
            is_html: true,
            ..Default::default()
        }
    }

    /// Address an HTML envelope from a request and its rendered body
    pub fn from_request(request: &EmailRequest, body: String) -> Self {
        Self {
            to: request.recipients.clone(),
            cc: request.cc.clone().unwrap_or_default(),
            bcc: request.bcc.clone().unwrap_or_default(),
            subject: request.subject.clone(),
            body,
            is_html: true,
        }
    }

    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    pub fn plain_text(mut self) -> Self {
        self.is_html = false;
        self
    }
}

/// Trait for sending assembled emails
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send without attachments
    async fn send(&self, envelope: &EmailEnvelope) -> DispatchOutcome;

    /// Attach one local file; an empty path is skipped
    async fn send_with_attachment_path(
        &self,
        envelope: &EmailEnvelope,
        file_path: &Path,
    ) -> DispatchOutcome;

    /// Attach one named stream; an empty name or absent stream is skipped
    async fn send_with_attachment_stream(
        &self,
        envelope: &EmailEnvelope,
        file_name: &str,
        stream: Option<FileStream>,
    ) -> DispatchOutcome;

    async fn send_with_attachment_paths(
        &self,
        envelope: &EmailEnvelope,
        file_paths: &[PathBuf],
    ) -> DispatchOutcome;

    async fn send_with_attachment_streams(
        &self,
        envelope: &EmailEnvelope,
        attachments: Vec<Attachment>,
    ) -> DispatchOutcome;
}

/// Transport that serializes messages with lettre and submits them raw
pub struct MimeTransport<P: EmailProvider> {
    provider: Arc<P>,
    sender: String,
}

impl<P: EmailProvider> MimeTransport<P> {
    pub fn new(provider: Arc<P>, sender: impl Into<String>) -> Self {
        Self {
            provider,
            sender: sender.into(),
        }
    }

    async fn dispatch(
        &self,
        envelope: &EmailEnvelope,
        attachments: Vec<AttachmentSource>,
    ) -> DispatchOutcome {
        let message = RenderedMessage {
            sender: self.sender.clone(),
            to: envelope.to.clone(),
            cc: envelope.cc.clone(),
            bcc: envelope.bcc.clone(),
            subject: envelope.subject.clone(),
            body: envelope.body.clone(),
            is_html: envelope.is_html,
            attachments,
        };

        let raw = match message.serialize().await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, subject = %envelope.subject, "Failed to build email");
                return record(DispatchOutcome::ClientError);
            }
        };

        let response = match self.provider.send_raw(&raw).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    error = %e,
                    provider = self.provider.provider_name(),
                    subject = %envelope.subject,
                    "Failed to submit email"
                );
                return record(DispatchOutcome::ClientError);
            }
        };

        let outcome = DispatchOutcome::from_status(response.status);
        let message_id = response.message_id.as_deref().unwrap_or_default();
        let timestamp = Utc::now().to_rfc3339();

        if outcome.is_success() {
            info!(message_id, timestamp = %timestamp, "Email sent");
        } else {
            warn!(
                message_id,
                timestamp = %timestamp,
                status = response.status.as_u16(),
                "Email rejected by provider"
            );
        }

        record(outcome)
    }
}

fn record(outcome: DispatchOutcome) -> DispatchOutcome {
    counter!("courier_emails_sent_total", "outcome" => outcome.as_str()).increment(1);
    outcome
}

#[async_trait]
impl<P: EmailProvider> EmailTransport for MimeTransport<P> {
    async fn send(&self, envelope: &EmailEnvelope) -> DispatchOutcome {
        self.dispatch(envelope, Vec::new()).await
    }

    async fn send_with_attachment_path(
        &self,
        envelope: &EmailEnvelope,
        file_path: &Path,
    ) -> DispatchOutcome {
        self.dispatch(envelope, vec![AttachmentSource::Path(file_path.to_path_buf())])
            .await
    }

    async fn send_with_attachment_stream(
        &self,
        envelope: &EmailEnvelope,
        file_name: &str,
        stream: Option<FileStream>,
    ) -> DispatchOutcome {
        let attachment = Attachment {
            file_name: file_name.to_string(),
            stream,
        };
        self.dispatch(envelope, vec![AttachmentSource::Stream(attachment)])
            .await
    }

    async fn send_with_attachment_paths(
        &self,
        envelope: &EmailEnvelope,
        file_paths: &[PathBuf],
    ) -> DispatchOutcome {
        let sources = file_paths
            .iter()
            .cloned()
            .map(AttachmentSource::Path)
            .collect();
        self.dispatch(envelope, sources).await
    }

    async fn send_with_attachment_streams(
        &self,
        envelope: &EmailEnvelope,
        attachments: Vec<Attachment>,
    ) -> DispatchOutcome {
        let sources = attachments
            .into_iter()
            .map(AttachmentSource::Stream)
            .collect();
        self.dispatch(envelope, sources).await
    }
}
