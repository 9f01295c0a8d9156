use crate::domain::episode::TranslationError;
use async_trait::async_trait;

/// Machine translation provider
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;
}
