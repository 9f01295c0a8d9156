use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::infrastructure::repositories::elevenlabs_tts_repository::{DEFAULT_MODEL, ELEVENLABS_URL};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub tts_provider: TtsProvider,
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_secret_id: String,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model: String,
    // Local shell
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    // Object storage shell
    pub input_bucket: String,
    pub output_bucket: String,
    pub archive_prefix: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    ElevenLabs,
    Polly,
}

impl TtsProvider {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "elevenlabs" => Ok(TtsProvider::ElevenLabs),
            "polly" => Ok(TtsProvider::Polly),
            other => Err(format!(
                "unknown TTS_PROVIDER '{}', expected 'elevenlabs' or 'polly'",
                other
            )),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-west-2".to_string()),
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_provider: TtsProvider::parse(
                &env::var("TTS_PROVIDER").unwrap_or_else(|_| "elevenlabs".to_string()),
            )?,
            elevenlabs_api_key: env::var("ELEVENLABS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            elevenlabs_secret_id: env::var("ELEVENLABS_SECRET_ID")
                .unwrap_or_else(|_| "elevenlabs-api-key".to_string()),
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| ELEVENLABS_URL.to_string()),
            elevenlabs_model: env::var("ELEVENLABS_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            input_dir: env::var("INPUT_DIR")
                .unwrap_or_else(|_| "input".to_string())
                .into(),
            output_dir: env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "output".to_string())
                .into(),
            input_bucket: env::var("INPUT_BUCKET")
                .unwrap_or_else(|_| "my-podcast-input".to_string()),
            output_bucket: env::var("OUTPUT_BUCKET")
                .unwrap_or_else(|_| "my-podcast-output".to_string()),
            archive_prefix: env::var("ARCHIVE_PREFIX").unwrap_or_else(|_| "episodes/".to_string()),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
