use crate::domain::episode::{SynthesisError, VoiceSettings};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs, AWS Polly, etc.)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Mapping provider failures to `SynthesisError`
/// - Picking a voice when the document does not name one
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Short provider name used in logs and readiness reports
    fn provider(&self) -> &'static str;

    /// Voice used when a document header does not set one
    fn default_voice(&self, language: &str) -> String;

    /// Synthesize text to speech with fully resolved voice settings
    ///
    /// Returns audio data ready for playback (MP3 format)
    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>, SynthesisError>;
}
