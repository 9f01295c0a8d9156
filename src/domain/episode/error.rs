/// Failure reported by a translation provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct TranslationError {
    pub message: String,
}

impl TranslationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by a speech synthesis provider.
///
/// `status` is set when the provider answered with a non-success HTTP status;
/// transport failures leave it empty.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SynthesisError {
    pub status: Option<u16>,
    pub message: String,
}

impl SynthesisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Build an error from a non-success provider response, preferring the
    /// provider's own message over the generic one.
    pub fn from_status(status: u16, provider_message: Option<String>) -> Self {
        let message = provider_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("synthesis failed with status {}", status));
        Self {
            status: Some(status),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("invalid {key} value '{value}': expected a percentage between 0 and 100")]
    InvalidSetting { key: String, value: String },
    #[error("document '{0}' has no text to speak")]
    EmptyBody(String),
}
