use super::{ArtifactSink, DocumentSource, StorageError, StoredArtifact, DOCUMENT_EXTENSION};
use crate::domain::episode::Document;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads `*.txt` scripts from a directory (non-recursive)
pub struct LocalDocumentSource {
    input_dir: PathBuf,
}

impl LocalDocumentSource {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for LocalDocumentSource {
    fn describe(&self) -> String {
        format!("{}/", self.input_dir.display())
    }

    fn location(&self, name: &str) -> String {
        self.input_dir.join(name).display().to_string()
    }

    async fn list_documents(&self) -> Result<Vec<String>, StorageError> {
        let list_error = |e: std::io::Error| StorageError::List {
            location: self.describe(),
            message: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(&self.input_dir)
            .await
            .map_err(list_error)?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
            // Follows symlinks, so linked scripts are picked up too
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(DOCUMENT_EXTENSION) {
                    names.push(name.to_string());
                }
            }
        }

        Ok(names)
    }

    async fn read_document(&self, name: &str) -> Result<Document, StorageError> {
        let location = self.location(name);
        let content = tokio::fs::read_to_string(self.input_dir.join(name))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound(location.clone()),
                ErrorKind::InvalidData => StorageError::InvalidUtf8(location.clone()),
                _ => StorageError::Read {
                    location: location.clone(),
                    message: e.to_string(),
                },
            })?;

        Ok(Document::new(name, content))
    }
}

/// Writes artifacts into a directory, creating it on demand
pub struct LocalArtifactSink {
    output_dir: PathBuf,
}

impl LocalArtifactSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl ArtifactSink for LocalArtifactSink {
    async fn store(&self, key: &str, audio_data: &[u8]) -> Result<StoredArtifact, StorageError> {
        let path = self.output_dir.join(key);
        let location = path.display().to_string();
        let write_error = |e: std::io::Error| StorageError::Write {
            location: location.clone(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(write_error)?;
        tokio::fs::write(&path, audio_data)
            .await
            .map_err(write_error)?;

        Ok(StoredArtifact {
            key: key.to_string(),
            location,
        })
    }
}
