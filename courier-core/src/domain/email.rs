//! Email request domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use tokio::io::AsyncRead;
use utoipa::ToSchema;

/// Owned byte stream for a stored file. Read once, to completion.
pub type FileStream = Pin<Box<dyn AsyncRead + Send>>;

/// High-level request to send one templated email
///
/// Field names follow the public JSON contract; the original contract names
/// (`emailTemplateCodes`, `emailBodyData`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    /// Primary recipients, in order
    #[serde(default)]
    pub recipients: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<String>>,

    #[serde(default)]
    pub subject: String,

    /// Name of the template object in the storage bucket
    #[serde(alias = "emailTemplateCodes", alias = "emailTemplateCode")]
    pub template_code: String,

    /// Placeholder name to substitution value, applied as `[name]` -> value
    #[serde(default, alias = "emailBodyData")]
    pub body_data: BTreeMap<String, String>,

    /// Names of storage objects to attach
    #[serde(default)]
    pub attachment_file_names: Vec<String>,
}

impl EmailRequest {
    pub fn new(
        recipients: Vec<String>,
        subject: impl Into<String>,
        template_code: impl Into<String>,
    ) -> Self {
        Self {
            recipients,
            cc: None,
            bcc: None,
            subject: subject.into(),
            template_code: template_code.into(),
            body_data: BTreeMap::new(),
            attachment_file_names: Vec::new(),
        }
    }

    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = Some(cc);
        self
    }

    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = Some(bcc);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body_data.insert(key.into(), value.into());
        self
    }

    pub fn with_attachment(mut self, file_name: impl Into<String>) -> Self {
        self.attachment_file_names.push(file_name.into());
        self
    }
}

/// A named file stream to be attached to an outgoing message
///
/// Attachments with an empty name or no stream are skipped by the transport.
pub struct Attachment {
    pub file_name: String,
    pub stream: Option<FileStream>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, stream: FileStream) -> Self {
        Self {
            file_name: file_name.into(),
            stream: Some(stream),
        }
    }

    /// Whether the transport will include this attachment
    pub fn is_attachable(&self) -> bool {
        !self.file_name.is_empty() && self.stream.is_some()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("has_stream", &self.stream.is_some())
            .finish()
    }
}
