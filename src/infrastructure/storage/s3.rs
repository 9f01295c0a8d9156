use super::{
    ArtifactSink, DocumentSource, StorageError, StoredArtifact, AUDIO_CONTENT_TYPE,
    DOCUMENT_EXTENSION,
};
use crate::domain::episode::Document;
use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client as S3Client};
use std::sync::Arc;

fn s3_url(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

/// Reads `*.txt` objects from a bucket
pub struct S3DocumentSource {
    client: Arc<S3Client>,
    bucket: String,
}

impl S3DocumentSource {
    pub fn new(client: Arc<S3Client>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for S3DocumentSource {
    fn describe(&self) -> String {
        format!("s3://{}/", self.bucket)
    }

    fn location(&self, name: &str) -> String {
        s3_url(&self.bucket, name)
    }

    async fn list_documents(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(bucket = %self.bucket, error = %DisplayErrorContext(&e), "S3 list_objects_v2 failed");
                    StorageError::List {
                        location: self.describe(),
                        message: DisplayErrorContext(&e).to_string(),
                    }
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| key.ends_with(DOCUMENT_EXTENSION))
                    .map(str::to_string),
            );

            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    async fn read_document(&self, name: &str) -> Result<Document, StorageError> {
        let location = self.location(name);
        let read_error = |message: String| StorageError::Read {
            location: location.clone(),
            message,
        };

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| read_error(DisplayErrorContext(&e).to_string()))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| read_error(e.to_string()))?
            .into_bytes();

        let content = String::from_utf8(bytes.to_vec())
            .map_err(|_| StorageError::InvalidUtf8(location.clone()))?;

        Ok(Document::new(name, content))
    }
}

/// Writes artifacts to a bucket, optionally under a key prefix
pub struct S3ArtifactSink {
    client: Arc<S3Client>,
    bucket: String,
    prefix: String,
}

impl S3ArtifactSink {
    pub fn new(client: Arc<S3Client>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[async_trait]
impl ArtifactSink for S3ArtifactSink {
    async fn store(&self, key: &str, audio_data: &[u8]) -> Result<StoredArtifact, StorageError> {
        let full_key = format!("{}{}", self.prefix, key);
        let location = s3_url(&self.bucket, &full_key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .body(ByteStream::from(audio_data.to_vec()))
            .content_type(AUDIO_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(location = %location, error = %DisplayErrorContext(&e), "S3 put_object failed");
                StorageError::Write {
                    location: location.clone(),
                    message: DisplayErrorContext(&e).to_string(),
                }
            })?;

        Ok(StoredArtifact {
            key: full_key,
            location,
        })
    }
}
