//! Object storage for email templates and attachment files
//!
//! Templates and attachments live in a bucket and are read as byte streams.
//! The orchestration layer only ever calls [`FileStore::stream_file`]; `store`
//! and `delete` round out the collaborator for tooling and tests.

pub mod s3;

pub use crate::domain::FileStream;
pub use s3::S3FileStore;

use async_trait::async_trait;
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Storage provider error: {0}")]
    Provider(String),
}

/// Trait for object stores holding templates and attachments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Open a stored file as a byte stream
    async fn stream_file(&self, name: &str, bucket: &str) -> Result<FileStream, StorageError>;

    /// Store bytes under `name`, returning the stored key
    async fn store(&self, content: Vec<u8>, name: &str, bucket: &str)
        -> Result<String, StorageError>;

    /// Delete a stored file
    async fn delete(&self, name: &str, bucket: &str) -> Result<(), StorageError>;
}
