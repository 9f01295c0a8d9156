pub mod batch;
pub mod document;
pub mod error;
pub mod service;
pub mod settings;

pub use batch::{BatchResult, BatchRunner, Delivery, DocumentFailure, DocumentOutcome};
pub use document::{output_key, parse_document, Document, EpisodeConfig, ParsedDocument};
pub use error::{ConversionError, SynthesisError, TranslationError};
pub use service::{AudioArtifact, EpisodeService, EpisodeServiceApi};
pub use settings::{needs_translation, EpisodeSettings, VoiceSettings, SOURCE_LANGUAGE};
