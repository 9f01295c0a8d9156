pub mod local;
pub mod memory;
pub mod s3;

pub use local::{LocalArtifactSink, LocalDocumentSource};
pub use memory::MemoryStorage;
pub use s3::{S3ArtifactSink, S3DocumentSource};

use crate::domain::episode::Document;
use async_trait::async_trait;

/// Only files with this suffix are picked up as scripts
pub const DOCUMENT_EXTENSION: &str = ".txt";

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to list {location}: {message}")]
    List { location: String, message: String },

    #[error("failed to read {location}: {message}")]
    Read { location: String, message: String },

    #[error("failed to write {location}: {message}")]
    Write { location: String, message: String },

    #[error("{0} is not valid UTF-8 text")]
    InvalidUtf8(String),

    #[error("document not found: {0}")]
    NotFound(String),
}

/// Where an artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub key: String,
    /// Human-readable destination, e.g. `output/ep1.mp3` or `s3://bucket/ep1.mp3`
    pub location: String,
}

/// Supplies the documents of a batch
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Where documents come from, for logs
    fn describe(&self) -> String;

    /// Human-readable location of a single document
    fn location(&self, name: &str) -> String;

    /// Names of all documents available. Order is not significant.
    async fn list_documents(&self) -> Result<Vec<String>, StorageError>;

    async fn read_document(&self, name: &str) -> Result<Document, StorageError>;
}

/// Persists synthesized audio
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn store(&self, key: &str, audio_data: &[u8]) -> Result<StoredArtifact, StorageError>;
}
