//! Amazon S3 file store

use super::{FileStore, FileStream, StorageError};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{error::SdkError, primitives::ByteStream, Client};
use tracing::debug;

/// S3-backed [`FileStore`]
///
/// Works against AWS S3 and S3-compatible stores (LocalStack, MinIO) when a
/// custom endpoint is configured.
#[derive(Clone)]
pub struct S3FileStore {
    client: Client,
}

impl S3FileStore {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared SDK configuration
    ///
    /// Custom endpoints rarely support virtual-hosted buckets, so path-style
    /// addressing is forced whenever one is set.
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        let force_path_style = sdk_config.endpoint_url().is_some();
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(force_path_style)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

/// Map an SDK error, treating dispatch and timeout failures as network errors
fn classify<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StorageError::Network(err.to_string())
        }
        _ => StorageError::Provider(aws_sdk_s3::error::DisplayErrorContext(&err).to_string()),
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn stream_file(&self, name: &str, bucket: &str) -> Result<FileStream, StorageError> {
        debug!(bucket, key = name, "Fetching object");

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|err| err.is_no_such_key()) {
                    StorageError::NotFound(format!("{}/{}", bucket, name))
                } else {
                    classify(e)
                }
            })?;

        Ok(Box::pin(output.body.into_async_read()))
    }

    async fn store(
        &self,
        content: Vec<u8>,
        name: &str,
        bucket: &str,
    ) -> Result<String, StorageError> {
        debug!(bucket, key = name, size = content.len(), "Storing object");

        let content_type = mime_guess::from_path(name)
            .first_or_octet_stream()
            .to_string();

        self.client
            .put_object()
            .bucket(bucket)
            .key(name)
            .content_type(content_type)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(classify)?;

        Ok(name.to_string())
    }

    async fn delete(&self, name: &str, bucket: &str) -> Result<(), StorageError> {
        debug!(bucket, key = name, "Deleting object");

        self.client
            .delete_object()
            .bucket(bucket)
            .key(name)
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }
}
