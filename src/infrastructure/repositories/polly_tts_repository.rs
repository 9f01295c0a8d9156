use super::tts_repository::TtsRepository;
use crate::domain::episode::{SynthesisError, VoiceSettings};
use async_trait::async_trait;
use aws_sdk_polly::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

const FALLBACK_VOICE: &str = "Matthew";

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?]+\s+)").expect("sentence pattern is valid"));

/// Neural voice for each supported target language
const LANGUAGE_VOICES: &[(&str, &str)] = &[
    ("en", "Matthew"),
    ("es", "Lucia"),
    ("fr", "Lea"),
    ("de", "Vicki"),
    ("pt", "Camila"),
    ("it", "Bianca"),
    ("ja", "Takumi"),
    ("ko", "Seoyeon"),
    ("zh", "Zhiyu"),
    ("ar", "Hala"),
    ("nl", "Laura"),
    ("pl", "Ola"),
    ("sv", "Elin"),
];

/// Select the Polly voice for a language, falling back to English
pub fn voice_for_language(language: &str) -> &'static str {
    LANGUAGE_VOICES
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, voice)| *voice)
        .unwrap_or(FALLBACK_VOICE)
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most MAX_BATCH_SIZE bytes; a sentence longer than that
/// is cut on char boundaries.
fn split_into_batches(text: &str) -> Vec<String> {
    if text.len() <= MAX_BATCH_SIZE {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    let mut pieces: Vec<&str> = SENTENCE_END
        .find_iter(text)
        .map(|mat| {
            let sentence = &text[last_end..mat.end()];
            last_end = mat.end();
            sentence
        })
        .collect();
    if last_end < text.len() {
        pieces.push(&text[last_end..]);
    }

    for piece in pieces {
        if !current_batch.is_empty() && current_batch.len() + piece.len() > MAX_BATCH_SIZE {
            flush_batch(&mut batches, &mut current_batch);
        }

        if piece.len() > MAX_BATCH_SIZE {
            push_char_chunks(&mut batches, piece);
        } else {
            current_batch.push_str(piece);
        }
    }

    flush_batch(&mut batches, &mut current_batch);

    batches
}

fn flush_batch(batches: &mut Vec<String>, current_batch: &mut String) {
    let trimmed = current_batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
    current_batch.clear();
}

/// No sentence boundary to use: cut on char boundaries
fn push_char_chunks(batches: &mut Vec<String>, text: &str) {
    let mut chunk = String::new();
    for c in text.chars() {
        if chunk.len() + c.len_utf8() > MAX_BATCH_SIZE {
            batches.push(std::mem::take(&mut chunk));
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        batches.push(chunk);
    }
}

/// AWS Polly implementation of TTS repository.
///
/// Polly has no notion of stability, similarity or style; those settings are
/// accepted and ignored.
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(&self, text: &str, voice_name: &str) -> Result<Vec<u8>, SynthesisError> {
        let voice_id = VoiceId::from(voice_name);

        tracing::info!(
            voice = voice_name,
            engine = "neural",
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    voice = voice_name,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                let message = e
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("AWS Polly error: {}", DisplayErrorContext(&e)));
                SynthesisError::new(message)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SynthesisError::new(format!("Failed to read audio stream: {}", e))
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn provider(&self) -> &'static str {
        "polly"
    }

    fn default_voice(&self, language: &str) -> String {
        voice_for_language(language).to_string()
    }

    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();

        tracing::debug!(
            stability = voice.stability,
            similarity = voice.similarity,
            style = voice.style,
            "Voice tuning is not supported by Polly and is ignored"
        );

        let batches = split_into_batches(text);
        tracing::info!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio_data = self.call_polly(batch, &voice.voice_id).await?;
            merged_audio.extend(audio_data);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}
