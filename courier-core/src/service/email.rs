//! Email orchestration: resolve requests and hand them to the transport

use crate::domain::{Attachment, DispatchOutcome, EmailRequest};
use crate::email::{EmailEnvelope, EmailTransport, RenderError, TemplateRenderer};
use crate::storage::{FileStore, StorageError};
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};

/// Failures while resolving a request into a sendable email
///
/// These never leave the service; they are logged and reported to callers
/// as [`DispatchOutcome::ClientError`].
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("No email request supplied")]
    MissingRequest,

    #[error("Failed to fetch '{name}': {source}")]
    Storage {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: RenderError,
    },
}

/// Service for sending templated emails
pub struct EmailService<S: FileStore, T: EmailTransport> {
    store: Arc<S>,
    transport: Arc<T>,
    renderer: TemplateRenderer,
    bucket: String,
}

impl<S: FileStore, T: EmailTransport> EmailService<S, T> {
    pub fn new(store: Arc<S>, transport: Arc<T>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            transport,
            renderer: TemplateRenderer::new(),
            bucket: bucket.into(),
        }
    }

    /// Send one templated email
    ///
    /// Requests with attachments go through the multi-stream transport path,
    /// others through the plain path.
    pub async fn send_email(&self, request: Option<&EmailRequest>) -> DispatchOutcome {
        let result = match request {
            Some(request) => self.dispatch(request).await,
            None => Err(EmailError::MissingRequest),
        };

        result.unwrap_or_else(|e| {
            error!(error = %e, "Failed to send email");
            DispatchOutcome::ClientError
        })
    }

    /// Send a batch of templated emails, strictly in order
    ///
    /// Reports success once every request has been attempted. The first
    /// request that cannot be resolved aborts the rest of the batch. Transport
    /// outcomes of individual requests are logged by the transport but do not
    /// change the batch outcome.
    pub async fn send_emails(&self, requests: Option<&[EmailRequest]>) -> DispatchOutcome {
        let Some(requests) = requests else {
            error!(error = %EmailError::MissingRequest, "Failed to send email batch");
            return DispatchOutcome::ClientError;
        };

        for (index, request) in requests.iter().enumerate() {
            if let Err(e) = self.dispatch(request).await {
                error!(
                    index,
                    total = requests.len(),
                    error = %e,
                    "Email batch aborted"
                );
                return DispatchOutcome::ClientError;
            }
        }

        info!(count = requests.len(), "Email batch dispatched");
        DispatchOutcome::Success
    }

    /// Render a request's template with its substitution data
    pub async fn render(&self, request: &EmailRequest) -> Result<String, EmailError> {
        let template = self
            .store
            .stream_file(&request.template_code, &self.bucket)
            .await
            .map_err(|source| EmailError::Storage {
                name: request.template_code.clone(),
                source,
            })?;

        self.renderer
            .render(template, &request.body_data)
            .await
            .map_err(|source| EmailError::Render {
                template: request.template_code.clone(),
                source,
            })
    }

    async fn dispatch(&self, request: &EmailRequest) -> Result<DispatchOutcome, EmailError> {
        let body = self.render(request).await?;
        let attachments = self.fetch_attachments(request).await?;
        let envelope = EmailEnvelope::from_request(request, body);

        debug!(
            template = %request.template_code,
            recipients = envelope.to.len(),
            attachments = attachments.len(),
            "Dispatching email"
        );

        let outcome = if attachments.is_empty() {
            self.transport.send(&envelope).await
        } else {
            self.transport
                .send_with_attachment_streams(&envelope, attachments)
                .await
        };

        Ok(outcome)
    }

    /// Fetch every named attachment into memory
    async fn fetch_attachments(
        &self,
        request: &EmailRequest,
    ) -> Result<Vec<Attachment>, EmailError> {
        let mut attachments = Vec::with_capacity(request.attachment_file_names.len());

        for name in &request.attachment_file_names {
            let storage_error = |source| EmailError::Storage {
                name: name.clone(),
                source,
            };

            let mut stream = self
                .store
                .stream_file(name, &self.bucket)
                .await
                .map_err(storage_error)?;

            let mut content = Vec::new();
            stream
                .read_to_end(&mut content)
                .await
                .map_err(|e| storage_error(StorageError::Read(e)))?;

            attachments.push(Attachment::new(name.clone(), Box::pin(Cursor::new(content))));
        }

        Ok(attachments)
    }
}
