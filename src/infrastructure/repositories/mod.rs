pub mod aws_translate_repository;
pub mod elevenlabs_tts_repository;
pub mod polly_tts_repository;
pub mod translation_repository;
pub mod tts_repository;

pub use aws_translate_repository::AwsTranslateRepository;
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use translation_repository::TranslationRepository;
pub use tts_repository::TtsRepository;
