use super::translation_repository::TranslationRepository;
use crate::domain::episode::TranslationError;
use async_trait::async_trait;
use aws_sdk_translate::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    Client as TranslateClient,
};
use std::sync::Arc;

/// Amazon Translate implementation of the translation repository
pub struct AwsTranslateRepository {
    translate_client: Arc<TranslateClient>,
}

impl AwsTranslateRepository {
    pub fn new(translate_client: Arc<TranslateClient>) -> Self {
        Self { translate_client }
    }
}

#[async_trait]
impl TranslationRepository for AwsTranslateRepository {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let start_time = std::time::Instant::now();

        let output = self
            .translate_client
            .translate_text()
            .text(text)
            .source_language_code(source_language)
            .target_language_code(target_language)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    source_language,
                    target_language,
                    text_length = text.len(),
                    "AWS Translate translate_text failed"
                );
                let message = e
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("AWS Translate error: {}", DisplayErrorContext(&e)));
                TranslationError::new(message)
            })?;

        tracing::info!(
            provider = "aws_translate",
            latency_ms = start_time.elapsed().as_millis(),
            source_language,
            target_language,
            characters_count = text.len(),
            "Translation completed"
        );

        Ok(output.translated_text().to_string())
    }
}
