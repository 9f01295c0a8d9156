use aws_sdk_secretsmanager::{error::DisplayErrorContext, Client as SecretsClient};

use crate::error::{AppError, AppResult};

/// Read a plain-text secret from AWS Secrets Manager
pub async fn fetch_secret_string(client: &SecretsClient, secret_id: &str) -> AppResult<String> {
    let output = client
        .get_secret_value()
        .secret_id(secret_id)
        .send()
        .await
        .map_err(|e| {
            AppError::Config(format!(
                "failed to read secret '{}': {}",
                secret_id,
                DisplayErrorContext(&e)
            ))
        })?;

    output
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| AppError::Config(format!("secret '{}' has no string value", secret_id)))
}

/// ElevenLabs API key from the environment override, else Secrets Manager
pub async fn resolve_elevenlabs_api_key(
    env_override: Option<&str>,
    client: &SecretsClient,
    secret_id: &str,
) -> AppResult<String> {
    if let Some(key) = env_override {
        tracing::info!("Using ElevenLabs API key from environment");
        return Ok(key.to_string());
    }

    tracing::info!(secret_id, "Loading ElevenLabs API key from Secrets Manager");
    fetch_secret_string(client, secret_id).await
}
