use super::tts_repository::TtsRepository;
use crate::domain::episode::{SynthesisError, VoiceSettings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ELEVENLABS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
pub const DEFAULT_MODEL: &str = "eleven_multilingual_v2";

/// "Roger"
pub const DEFAULT_VOICE_ID: &str = "CwhRBWXzGAHq8TQ4Fs17";

const XI_API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: SpeechVoiceSettings,
}

#[derive(Debug, Serialize)]
struct SpeechVoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/{}", self.base_url, voice_id)
    }

    /// Pull `detail.message` out of an error body, if the provider sent one
    fn provider_message(body: &[u8]) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
        parsed
            .detail?
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    fn provider(&self) -> &'static str {
        "elevenlabs"
    }

    fn default_voice(&self, _language: &str) -> String {
        DEFAULT_VOICE_ID.to_string()
    }

    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();

        let request = SpeechRequest {
            text,
            model_id: &self.model,
            voice_settings: SpeechVoiceSettings {
                stability: voice.stability,
                similarity_boost: voice.similarity,
                style: voice.style,
                use_speaker_boost: true,
            },
        };

        tracing::info!(
            model = %self.model,
            voice = %voice.voice_id,
            text_length = text.len(),
            text_preview = %text.chars().take(200).collect::<String>(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .http_client
            .post(self.endpoint(&voice.voice_id))
            .header(XI_API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = %voice.voice_id, "ElevenLabs request failed");
                SynthesisError::new(format!("ElevenLabs request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read ElevenLabs response body");
            SynthesisError::new(format!("Failed to read ElevenLabs response: {}", e))
        })?;

        if !status.is_success() {
            let message = Self::provider_message(&body)
                .unwrap_or_else(|| format!("ElevenLabs error {}", status.as_u16()));
            tracing::error!(
                status = status.as_u16(),
                voice = %voice.voice_id,
                message = %message,
                "ElevenLabs rejected synthesis request"
            );
            return Err(SynthesisError::from_status(status.as_u16(), Some(message)));
        }

        tracing::info!(
            provider = "elevenlabs",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = body.len(),
            "TTS synthesis completed"
        );

        Ok(body.to_vec())
    }
}
