//! MIME message assembly
//!
//! A [`RenderedMessage`] is built by the transport for exactly one send and
//! consumed by [`RenderedMessage::serialize`], which reads every attachment
//! once and produces the raw bytes handed to the provider.

use super::provider::RawEmail;
use crate::domain::Attachment;
use lettre::message::{
    header::{ContentType, ContentTypeErr},
    Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart,
};
use lettre::Message;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Message assembly error types
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Failed to read attachment '{name}': {source}")]
    AttachmentRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid content type: {0}")]
    ContentType(#[from] ContentTypeErr),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Where an attachment's bytes come from
pub enum AttachmentSource {
    /// A file on the local filesystem, named by its file name
    Path(PathBuf),
    /// A named stream, typically fetched from storage
    Stream(Attachment),
}

impl AttachmentSource {
    /// Empty paths, empty names and absent streams are skipped
    fn is_attachable(&self) -> bool {
        match self {
            Self::Path(path) => !path.as_os_str().is_empty(),
            Self::Stream(attachment) => attachment.is_attachable(),
        }
    }

    async fn into_part(self) -> Result<SinglePart, MessageError> {
        let (name, content) = match self {
            Self::Path(path) => {
                let name = file_name_of(&path);
                let content =
                    tokio::fs::read(&path)
                        .await
                        .map_err(|source| MessageError::AttachmentRead {
                            name: path.display().to_string(),
                            source,
                        })?;
                (name, content)
            }
            Self::Stream(Attachment { file_name, stream }) => {
                let mut content = Vec::new();
                if let Some(mut stream) = stream {
                    stream.read_to_end(&mut content).await.map_err(|source| {
                        MessageError::AttachmentRead {
                            name: file_name.clone(),
                            source,
                        }
                    })?;
                }
                (file_name, content)
            }
        };

        let mime = mime_guess::from_path(&name).first_or_octet_stream();
        let content_type = ContentType::parse(mime.essence_str())?;

        Ok(MimeAttachment::new(name).body(content, content_type))
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn mailbox(address: &str) -> Result<Mailbox, MessageError> {
    address
        .parse()
        .map_err(|source| MessageError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

/// A fully resolved outgoing email
pub struct RenderedMessage {
    pub sender: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    pub attachments: Vec<AttachmentSource>,
}

impl RenderedMessage {
    /// Build the MIME message and its envelope
    ///
    /// Headers: From, Subject, Date (now, UTC) and To/Cc/Bcc when non-empty.
    /// Bcc is carried in the envelope only and never written to the payload.
    pub async fn serialize(self) -> Result<RawEmail, MessageError> {
        let mut builder = Message::builder()
            .from(mailbox(&self.sender)?)
            .subject(self.subject.as_str())
            .date_now();

        for address in &self.to {
            builder = builder.to(mailbox(address)?);
        }
        for address in &self.cc {
            builder = builder.cc(mailbox(address)?);
        }
        for address in &self.bcc {
            builder = builder.bcc(mailbox(address)?);
        }

        let body = if self.is_html {
            SinglePart::html(self.body)
        } else {
            SinglePart::plain(self.body)
        };

        let mut parts = Vec::new();
        for source in self.attachments {
            if source.is_attachable() {
                parts.push(source.into_part().await?);
            }
        }

        let message = if parts.is_empty() {
            builder.singlepart(body)?
        } else {
            let multipart = parts
                .into_iter()
                .fold(MultiPart::mixed().singlepart(body), |multipart, part| {
                    multipart.singlepart(part)
                });
            builder.multipart(multipart)?
        };

        Ok(RawEmail {
            from: self.sender,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            data: message.formatted(),
        })
    }
}
