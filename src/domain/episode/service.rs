use super::document::{output_key, parse_document, Document, ParsedDocument};
use super::error::ConversionError;
use super::settings::{EpisodeSettings, SOURCE_LANGUAGE};
use crate::infrastructure::repositories::{TranslationRepository, TtsRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Synthesized audio for one document, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    pub output_key: String,
    pub audio_data: Vec<u8>,
    /// Resolved target language, empty when none was requested
    pub language: String,
    /// Text that was actually spoken (translated when a translation ran)
    pub spoken_text: String,
}

pub struct EpisodeService {
    translation_repo: Arc<dyn TranslationRepository>,
    tts_repo: Arc<dyn TtsRepository>,
}

impl EpisodeService {
    pub fn new(
        translation_repo: Arc<dyn TranslationRepository>,
        tts_repo: Arc<dyn TtsRepository>,
    ) -> Self {
        Self {
            translation_repo,
            tts_repo,
        }
    }

    pub fn tts_provider(&self) -> &'static str {
        self.tts_repo.provider()
    }
}

#[async_trait]
pub trait EpisodeServiceApi: Send + Sync {
    /// Convert one raw document into an audio artifact
    ///
    /// This operation:
    /// - Parses the optional header block
    /// - Resolves voice settings against defaults
    /// - Translates the body when a non-source language is requested
    /// - Synthesizes the (possibly translated) body
    ///
    /// Nothing is persisted; storing the artifact is up to the caller.
    async fn convert(&self, document: &Document) -> Result<AudioArtifact, ConversionError>;

    /// Same as `convert` for callers that already hold header options and body
    async fn convert_parsed(
        &self,
        name: &str,
        parsed: ParsedDocument,
    ) -> Result<AudioArtifact, ConversionError>;
}

#[async_trait]
impl EpisodeServiceApi for EpisodeService {
    async fn convert(&self, document: &Document) -> Result<AudioArtifact, ConversionError> {
        let parsed = parse_document(&document.content);

        tracing::debug!(
            document = %document.name,
            header_options = parsed.config.len(),
            body_length = parsed.body.len(),
            "Document parsed"
        );

        self.convert_parsed(&document.name, parsed).await
    }

    async fn convert_parsed(
        &self,
        name: &str,
        parsed: ParsedDocument,
    ) -> Result<AudioArtifact, ConversionError> {
        let ParsedDocument { config, body } = parsed;

        // 1. Resolve settings before any provider is called
        let settings =
            EpisodeSettings::resolve(&config, |language| self.tts_repo.default_voice(language))?;

        if body.is_empty() {
            return Err(ConversionError::EmptyBody(name.to_string()));
        }

        // 2. Translate if needed
        let spoken_text = if settings.needs_translation() {
            self.translate(name, &body, &settings.language).await?
        } else {
            body
        };

        // 3. Synthesize
        tracing::info!(
            document = %name,
            provider = self.tts_repo.provider(),
            voice = %settings.voice.voice_id,
            stability = settings.voice.stability,
            similarity = settings.voice.similarity,
            style = settings.voice.style,
            "Generating audio"
        );

        let audio_data = self
            .tts_repo
            .synthesize(&spoken_text, &settings.voice)
            .await
            .map_err(|e| {
                tracing::error!(document = %name, status = ?e.status, error = %e, "Synthesis failed");
                ConversionError::from(e)
            })?;

        // 4. Derive the output key
        let output_key = output_key(name, &settings.language);

        tracing::info!(
            document = %name,
            output_key = %output_key,
            audio_size_bytes = audio_data.len(),
            "Episode converted"
        );

        Ok(AudioArtifact {
            output_key,
            audio_data,
            language: settings.language,
            spoken_text,
        })
    }
}

impl EpisodeService {
    async fn translate(
        &self,
        name: &str,
        body: &str,
        target_language: &str,
    ) -> Result<String, ConversionError> {
        tracing::info!(document = %name, target_language, "Translating");

        let translated = self
            .translation_repo
            .translate(body, SOURCE_LANGUAGE, target_language)
            .await
            .map_err(|e| {
                tracing::error!(document = %name, target_language, error = %e, "Translation failed");
                ConversionError::from(e)
            })?;

        tracing::info!(
            document = %name,
            translated_length = translated.chars().count(),
            "Translated"
        );

        Ok(translated)
    }
}
