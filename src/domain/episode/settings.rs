use super::document::EpisodeConfig;
use super::error::ConversionError;

/// Language every script is written in
pub const SOURCE_LANGUAGE: &str = "en";

pub const DEFAULT_STABILITY: f32 = 0.50;
pub const DEFAULT_SIMILARITY: f32 = 0.75;
pub const DEFAULT_STYLE: f32 = 0.0;

pub const LANG_KEY: &str = "lang";
pub const VOICE_KEY: &str = "voice";
pub const STABILITY_KEY: &str = "stability";
pub const SIMILARITY_KEY: &str = "similarity";
pub const STYLE_KEY: &str = "style";

/// Voice parameters handed to a synthesizer. Fractions are in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub voice_id: String,
    pub stability: f32,
    pub similarity: f32,
    pub style: f32,
}

/// Header options merged with defaults
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSettings {
    pub language: String,
    pub voice: VoiceSettings,
}

impl EpisodeSettings {
    /// Resolve every option against its default.
    ///
    /// `default_voice` is only consulted when the header has no `voice`.
    pub fn resolve(
        config: &EpisodeConfig,
        default_voice: impl FnOnce(&str) -> String,
    ) -> Result<Self, ConversionError> {
        let language = config.get(LANG_KEY).unwrap_or_default().to_string();

        let voice_id = match config.get(VOICE_KEY) {
            Some(voice) if !voice.is_empty() => voice.to_string(),
            _ => default_voice(&language),
        };

        Ok(Self {
            voice: VoiceSettings {
                voice_id,
                stability: resolve_fraction(config, STABILITY_KEY, DEFAULT_STABILITY)?,
                similarity: resolve_fraction(config, SIMILARITY_KEY, DEFAULT_SIMILARITY)?,
                style: resolve_fraction(config, STYLE_KEY, DEFAULT_STYLE)?,
            },
            language,
        })
    }

    pub fn needs_translation(&self) -> bool {
        needs_translation(&self.language)
    }
}

/// Translation runs only for a non-empty target that differs from the source
pub fn needs_translation(language: &str) -> bool {
    !language.is_empty() && language != SOURCE_LANGUAGE
}

/// Header values are whole percentages; the synthesizer wants a fraction.
/// A blank value counts as absent.
fn resolve_fraction(
    config: &EpisodeConfig,
    key: &str,
    default: f32,
) -> Result<f32, ConversionError> {
    let percentage = match config.get(key).map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => raw
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ConversionError::InvalidSetting {
                key: key.to_string(),
                value: raw.to_string(),
            })?,
        None => default * 100.0,
    };

    Ok((percentage / 100.0).clamp(0.0, 1.0))
}
