use axum::{
    body::{Body, Bytes},
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::episode::{
        document::EpisodeConfig,
        settings::{LANG_KEY, SIMILARITY_KEY, STABILITY_KEY, STYLE_KEY, VOICE_KEY},
        EpisodeServiceApi, ParsedDocument,
    },
    error::{AppError, AppResult},
    infrastructure::storage::{ArtifactSink, AUDIO_CONTENT_TYPE},
};

/// Base name of artifacts produced through the HTTP front end
const HTTP_DOCUMENT_NAME: &str = "podcast";

const DEFAULT_ARCHIVE_FILENAME: &str = "episode.mp3";

pub const X_TRANSLATED_TEXT: &str = "x-translated-text";

/// Voice tuning as whole percentages (0-100)
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Tuning {
    pub stability: Option<f32>,
    pub similarity: Option<f32>,
    pub style: Option<f32>,
}

/// Request for POST /generate
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<Tuning>,
}

impl GenerateRequest {
    /// Express the request as the header options and body of a document
    fn into_parsed_document(self) -> ParsedDocument {
        let mut config = EpisodeConfig::new();

        if let Some(lang) = self.target_lang.filter(|l| !l.trim().is_empty()) {
            config.insert(LANG_KEY, lang.trim());
        }
        if let Some(voice) = self.voice_id.filter(|v| !v.trim().is_empty()) {
            config.insert(VOICE_KEY, voice.trim());
        }
        let tuning = self.tuning.unwrap_or_default();
        for (key, value) in [
            (STABILITY_KEY, tuning.stability),
            (SIMILARITY_KEY, tuning.similarity),
            (STYLE_KEY, tuning.style),
        ] {
            if let Some(value) = value {
                config.insert(key, value.to_string());
            }
        }

        ParsedDocument {
            config,
            body: self.text.trim().to_string(),
        }
    }
}

/// Response for POST /save-to-s3
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
    pub s3_url: String,
    pub key: String,
}

pub struct EpisodeController {
    episode_service: Arc<dyn EpisodeServiceApi>,
    archive: Option<Arc<dyn ArtifactSink>>,
}

impl EpisodeController {
    pub fn new(
        episode_service: Arc<dyn EpisodeServiceApi>,
        archive: Option<Arc<dyn ArtifactSink>>,
    ) -> Self {
        Self {
            episode_service,
            archive,
        }
    }

    /// POST /generate - Translate (optionally) and synthesize a single text
    pub async fn generate(
        State(controller): State<Arc<EpisodeController>>,
        Json(request): Json<GenerateRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        if request.text.trim().is_empty() {
            return Err(AppError::BadRequest("Text is required".to_string()));
        }

        let artifact = controller
            .episode_service
            .convert_parsed(HTTP_DOCUMENT_NAME, request.into_parsed_document())
            .await?;

        let translated_text = if artifact.language.is_empty() {
            String::new()
        } else {
            urlencoding::encode(&artifact.spoken_text).into_owned()
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_CONTENT_TYPE));
        headers.insert(
            header::CONTENT_DISPOSITION,
            header_value(format!("inline; filename=\"{}\"", artifact.output_key))?,
        );
        headers.insert(X_TRANSLATED_TEXT, header_value(translated_text)?);

        Ok((StatusCode::OK, headers, Body::from(artifact.audio_data)))
    }

    /// POST /save-to-s3 - Archive an uploaded episode in the output bucket
    pub async fn save_to_archive(
        State(controller): State<Arc<EpisodeController>>,
        mut multipart: Multipart,
    ) -> AppResult<Json<SaveResponse>> {
        let archive = controller
            .archive
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("Audio archive is not configured".to_string()))?;

        let mut audio: Option<Bytes> = None;
        let mut filename: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("audio") => {
                    audio = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| AppError::BadRequest(e.to_string()))?,
                    );
                }
                Some("filename") => {
                    filename = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::BadRequest(e.to_string()))?,
                    );
                }
                _ => {}
            }
        }

        let audio = audio.ok_or_else(|| AppError::BadRequest("No audio file provided".to_string()))?;
        let filename = archive_filename(filename)?;

        let stored = archive.store(&filename, &audio).await?;

        tracing::info!(
            key = %stored.key,
            location = %stored.location,
            audio_size_bytes = audio.len(),
            "Episode archived"
        );

        Ok(Json(SaveResponse {
            message: "Saved".to_string(),
            s3_url: stored.location,
            key: stored.key,
        }))
    }
}

fn header_value(value: String) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|e| AppError::Internal(format!("invalid header value: {}", e)))
}

/// Archive names are single path segments
fn archive_filename(filename: Option<String>) -> AppResult<String> {
    let filename = filename
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_ARCHIVE_FILENAME.to_string());

    if filename.contains(|c: char| c == '/' || c == '\\') || filename == "." || filename == ".." {
        return Err(AppError::BadRequest(format!("Invalid filename: {}", filename)));
    }

    Ok(filename)
}
