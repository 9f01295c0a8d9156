use super::{ArtifactSink, DocumentSource, StorageError, StoredArtifact};
use crate::domain::episode::Document;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};

/// In-process document source and artifact sink.
///
/// Documents are listed in insertion order. Keys passed to `reject_key`
/// fail on store.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<Vec<Document>>,
    artifacts: Mutex<BTreeMap<String, Vec<u8>>>,
    rejected: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    pub fn reject_key(&self, key: impl Into<String>) {
        self.rejected.lock().insert(key.into());
    }

    pub fn artifact(&self, key: &str) -> Option<Vec<u8>> {
        self.artifacts.lock().get(key).cloned()
    }

    pub fn stored_keys(&self) -> Vec<String> {
        self.artifacts.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl DocumentSource for MemoryStorage {
    fn describe(&self) -> String {
        "memory://".to_string()
    }

    fn location(&self, name: &str) -> String {
        format!("memory://{}", name)
    }

    async fn list_documents(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.documents.lock().iter().map(|d| d.name.clone()).collect())
    }

    async fn read_document(&self, name: &str) -> Result<Document, StorageError> {
        self.documents
            .lock()
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(self.location(name)))
    }
}

#[async_trait]
impl ArtifactSink for MemoryStorage {
    async fn store(&self, key: &str, audio_data: &[u8]) -> Result<StoredArtifact, StorageError> {
        let location = self.location(key);
        if self.rejected.lock().contains(key) {
            return Err(StorageError::Write {
                location,
                message: "rejected".to_string(),
            });
        }

        self.artifacts
            .lock()
            .insert(key.to_string(), audio_data.to_vec());

        Ok(StoredArtifact {
            key: key.to_string(),
            location,
        })
    }
}
