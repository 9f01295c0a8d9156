use super::error::ConversionError;
use super::service::EpisodeServiceApi;
use crate::infrastructure::storage::{ArtifactSink, DocumentSource, StorageError};
use std::fmt;
use std::sync::Arc;

/// Why a single document did not make it to the sink
#[derive(Debug, thiserror::Error)]
pub enum DocumentFailure {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub output_key: String,
    pub location: String,
    pub audio_size_bytes: usize,
}

#[derive(Debug)]
pub struct DocumentOutcome {
    pub document: String,
    pub result: Result<Delivery, DocumentFailure>,
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-document outcomes of one batch, in processing order
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}/{} files processed successfully",
            self.success_count(),
            self.total()
        )?;
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(delivery) => writeln!(f, "  ✅ {} → {}", outcome.document, delivery.location)?,
                Err(err) => writeln!(f, "  ❌ {}: {}", outcome.document, err)?,
            }
        }
        Ok(())
    }
}

/// Runs every document of a source through the episode pipeline, one at a
/// time, and stores each artifact in the sink.
pub struct BatchRunner {
    episode_service: Arc<dyn EpisodeServiceApi>,
}

impl BatchRunner {
    pub fn new(episode_service: Arc<dyn EpisodeServiceApi>) -> Self {
        Self { episode_service }
    }

    /// Process all documents in lexicographic order.
    ///
    /// Only a failure to enumerate the source is returned as an error; every
    /// per-document failure is recorded in the result and the batch moves on.
    pub async fn run(
        &self,
        source: &dyn DocumentSource,
        sink: &dyn ArtifactSink,
    ) -> Result<BatchResult, StorageError> {
        let mut names = source.list_documents().await?;
        names.sort();
        names.dedup();

        tracing::info!(
            source = %source.describe(),
            document_count = names.len(),
            "Starting batch"
        );

        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            let result = self.process(source, sink, &name).await;
            match &result {
                Ok(delivery) => tracing::info!(
                    document = %name,
                    location = %delivery.location,
                    size_kb = format!("{:.1}", delivery.audio_size_bytes as f64 / 1024.0),
                    "Saved"
                ),
                Err(err) => tracing::error!(document = %name, error = %err, "Document failed"),
            }
            outcomes.push(DocumentOutcome {
                document: name,
                result,
            });
        }

        let result = BatchResult { outcomes };
        tracing::info!(
            succeeded = result.success_count(),
            failed = result.failure_count(),
            total = result.total(),
            "Batch finished"
        );

        Ok(result)
    }

    async fn process(
        &self,
        source: &dyn DocumentSource,
        sink: &dyn ArtifactSink,
        name: &str,
    ) -> Result<Delivery, DocumentFailure> {
        tracing::info!(document = %source.location(name), "Processing");

        let document = source.read_document(name).await?;
        let artifact = self.episode_service.convert(&document).await?;
        let stored = sink
            .store(&artifact.output_key, &artifact.audio_data)
            .await?;

        Ok(Delivery {
            output_key: stored.key,
            location: stored.location,
            audio_size_bytes: artifact.audio_data.len(),
        })
    }
}
