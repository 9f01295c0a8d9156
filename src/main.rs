use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use podcast_voice::controllers::{episode::EpisodeController, health::Readiness};
use podcast_voice::domain::episode::{BatchResult, BatchRunner, EpisodeService};
use podcast_voice::infrastructure::config::{Config, LogFormat, TtsProvider};
use podcast_voice::infrastructure::http::start_http_server;
use podcast_voice::infrastructure::repositories::{
    AwsTranslateRepository, ElevenLabsTtsRepository, PollyTtsRepository, TtsRepository,
};
use podcast_voice::infrastructure::secrets::resolve_elevenlabs_api_key;
use podcast_voice::infrastructure::storage::{
    ArtifactSink, LocalArtifactSink, LocalDocumentSource, S3ArtifactSink, S3DocumentSource,
};

#[derive(Debug, Parser)]
#[command(name = "podcast-voice", version, about = "Turn text scripts into narrated audio")]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert every .txt script in a directory
    Local {
        #[arg(long)]
        input_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Convert every .txt object in a bucket
    S3 {
        #[arg(long)]
        input_bucket: Option<String>,
        #[arg(long)]
        output_bucket: Option<String>,
    },
    /// Run the HTTP service
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config =
        Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    apply_overrides(&mut config, &cli);

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        region = %config.aws_region,
        tts_provider = ?config.tts_provider,
        development = config.is_development(),
        "Starting podcast-voice"
    );

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    let translate_client = Arc::new(aws_sdk_translate::Client::new(&aws_config));
    let translation_repo = Arc::new(AwsTranslateRepository::new(translate_client));
    let tts_repo = build_tts_repository(&config, &aws_config).await?;

    // 2. Instantiate services
    let episode_service = Arc::new(EpisodeService::new(translation_repo, tts_repo.clone()));

    let config = Arc::new(config);

    match cli.command {
        Command::Local { .. } => {
            tokio::fs::create_dir_all(&config.input_dir)
                .await
                .with_context(|| format!("failed to create {}", config.input_dir.display()))?;
            tokio::fs::create_dir_all(&config.output_dir)
                .await
                .with_context(|| format!("failed to create {}", config.output_dir.display()))?;

            let source = LocalDocumentSource::new(config.input_dir.clone());
            let sink = LocalArtifactSink::new(config.output_dir.clone());

            let result = BatchRunner::new(episode_service).run(&source, &sink).await?;
            report(
                &result,
                &format!(
                    "No .txt files found in {}/. Add a script there and run again.",
                    config.input_dir.display()
                ),
            );
        }
        Command::S3 { .. } => {
            let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));
            let source = S3DocumentSource::new(s3_client.clone(), config.input_bucket.clone());
            let sink = S3ArtifactSink::new(s3_client, config.output_bucket.clone());

            let result = BatchRunner::new(episode_service).run(&source, &sink).await?;
            report(
                &result,
                &format!(
                    "No .txt files found in s3://{}/. Upload a script there and run again.",
                    config.input_bucket
                ),
            );
        }
        Command::Serve { .. } => {
            let archive: Option<Arc<dyn ArtifactSink>> = if config.output_bucket.trim().is_empty() {
                tracing::warn!("OUTPUT_BUCKET is empty, /save-to-s3 is disabled");
                None
            } else {
                let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));
                let sink: Arc<dyn ArtifactSink> = Arc::new(
                    S3ArtifactSink::new(s3_client, config.output_bucket.clone())
                        .with_prefix(config.archive_prefix.clone()),
                );
                Some(sink)
            };

            // 3. Instantiate controllers
            let readiness = Arc::new(Readiness {
                tts_provider: tts_repo.provider(),
                archive_configured: archive.is_some(),
            });
            let episode_controller = Arc::new(EpisodeController::new(episode_service, archive));

            tracing::info!("Starting HTTP server on {}:{}", config.host, config.port);

            start_http_server(config.clone(), episode_controller, readiness)
                .await
                .map_err(|e| anyhow::anyhow!("HTTP server failed: {}", e))?;
        }
    }

    Ok(())
}

/// Command line flags win over the environment
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(format) = cli.log_format.as_deref() {
        config.log_format = match format {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
    }

    match &cli.command {
        Command::Local {
            input_dir,
            output_dir,
        } => {
            if let Some(dir) = input_dir {
                config.input_dir = dir.clone();
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
        }
        Command::S3 {
            input_bucket,
            output_bucket,
        } => {
            if let Some(bucket) = input_bucket {
                config.input_bucket = bucket.clone();
            }
            if let Some(bucket) = output_bucket {
                config.output_bucket = bucket.clone();
            }
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }
    }
}

async fn build_tts_repository(
    config: &Config,
    aws_config: &aws_config::SdkConfig,
) -> anyhow::Result<Arc<dyn TtsRepository>> {
    match config.tts_provider {
        TtsProvider::ElevenLabs => {
            let secrets_client = aws_sdk_secretsmanager::Client::new(aws_config);
            let api_key = resolve_elevenlabs_api_key(
                config.elevenlabs_api_key.as_deref(),
                &secrets_client,
                &config.elevenlabs_secret_id,
            )
            .await?;

            tracing::info!(model = %config.elevenlabs_model, "ElevenLabs synthesizer ready");
            Ok(Arc::new(ElevenLabsTtsRepository::new(
                api_key,
                config.elevenlabs_base_url.clone(),
                config.elevenlabs_model.clone(),
            )))
        }
        TtsProvider::Polly => {
            let polly_client = Arc::new(aws_sdk_polly::Client::new(aws_config));
            tracing::info!("AWS Polly synthesizer ready");
            Ok(Arc::new(PollyTtsRepository::new(polly_client)))
        }
    }
}

fn report(result: &BatchResult, empty_hint: &str) {
    if result.is_empty() {
        println!("{}", empty_hint);
        println!("Scripts may start with 'key: value' lines (lang, voice, stability, similarity, style) followed by '---'.");
    } else {
        print!("{}", result);
    }
}

fn init_logging(config: &Config) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "podcast_voice=info,tower_http=debug".into())
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
