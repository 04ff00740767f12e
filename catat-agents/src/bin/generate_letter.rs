use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::Deserialize;
use shared_types::{Language, LetterType};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use catat_agents::llm::{ClaudeClient, GroqClient, LlmClient};
use catat_agents::transcriber::{AudioClip, WhisperTranscriber};
use catat_agents::{LetterPipeline, LetterStructurer, LetterWriter};
use letter_layout::{markup_to_plain_text, normalize_with_outcome};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "generate-letter", about = "Generate or normalize a formal letter")]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["audio", "transcript", "markup"]),
))]
struct Cli {
    /// Path to an audio recording
    #[arg(long, value_name = "PATH", group = "input")]
    audio: Option<PathBuf>,

    /// Transcript text, skips speech recognition
    #[arg(long, group = "input")]
    transcript: Option<String>,

    /// Path to existing letter markup, only normalizes it
    #[arg(long, value_name = "PATH", group = "input")]
    markup: Option<PathBuf>,

    /// Letter language: en, ms or mixed
    #[arg(long, default_value = "en")]
    language: Language,

    /// Letter type: complaint, proposal, mc, general or official
    #[arg(long, default_value = "general")]
    letter_type: LetterType,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markup)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markup,
    Plain,
}

#[derive(Debug, Deserialize, Clone)]
struct ApiConfig {
    api_keys: Option<ApiKeysConfig>,
    models: Option<ModelsConfig>,
    upstream: Option<UpstreamConfig>,
}

#[derive(Debug, Deserialize, Clone)]
struct ApiKeysConfig {
    groq_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct ModelsConfig {
    transcription: Option<String>,
    structurer: Option<String>,
    writer: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct UpstreamConfig {
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let letter = if let Some(path) = &cli.markup {
        let markup = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read markup at {:?}", path))?;
        let normalization = normalize_with_outcome(&markup);
        tracing::info!(outcome = ?normalization.outcome, "Normalized letter");
        normalization.markup
    } else {
        let (config, config_path) = load_api_config().context("Failed to load catat API config")?;
        let pipeline = build_pipeline(&config, &config_path)?;

        let generated = match (&cli.audio, &cli.transcript) {
            (Some(path), None) => {
                let clip = load_audio(path)?;
                pipeline
                    .generate_from_audio(clip, cli.language, cli.letter_type)
                    .await?
            }
            (None, Some(transcript)) => {
                pipeline
                    .generate_from_transcript(transcript, cli.language, cli.letter_type)
                    .await?
            }
            _ => unreachable!("clap enforces exactly one input"),
        };

        if !generated.layout.missing_sections.is_empty() {
            tracing::warn!(
                "Letter is missing: {}",
                generated.layout.missing_sections.join(", ")
            );
        }
        generated.letter
    };

    match cli.format {
        OutputFormat::Markup => println!("{letter}"),
        OutputFormat::Plain => println!("{}", markup_to_plain_text(&letter)),
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_pipeline(config: &ApiConfig, config_path: &Path) -> Result<LetterPipeline> {
    let keys = config.api_keys.as_ref();
    let groq_api_key = keys
        .and_then(|keys| keys.groq_api_key.clone())
        .ok_or_else(|| anyhow::anyhow!("Missing groq_api_key in config at {:?}", config_path))?;
    let anthropic_api_key = keys
        .and_then(|keys| keys.anthropic_api_key.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("Missing anthropic_api_key in config at {:?}", config_path)
        })?;

    let timeout = Duration::from_secs(
        config
            .upstream
            .as_ref()
            .and_then(|upstream| upstream.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );
    let models = config.models.as_ref();

    let mut transcriber = WhisperTranscriber::new(groq_api_key.clone(), timeout)?;
    if let Some(model) = models.and_then(|m| m.transcription.clone()) {
        transcriber = transcriber.with_model(model);
    }

    let groq: Arc<dyn LlmClient> = Arc::new(GroqClient::new(groq_api_key, timeout)?);
    let mut structurer = LetterStructurer::new(groq);
    if let Some(model) = models.and_then(|m| m.structurer.clone()) {
        structurer = structurer.with_model(model);
    }

    let claude: Arc<dyn LlmClient> = Arc::new(ClaudeClient::new(anthropic_api_key, timeout)?);
    let mut writer = LetterWriter::new(claude);
    if let Some(model) = models.and_then(|m| m.writer.clone()) {
        writer = writer.with_model(model);
    }

    Ok(LetterPipeline::new(Arc::new(transcriber), structurer, writer))
}

fn load_audio(path: &Path) -> Result<AudioClip> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read audio file at {:?}", path))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let content_type = match extension.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "m4a" => "audio/m4a",
        _ => "audio/webm",
    };

    Ok(AudioClip {
        bytes,
        filename: path.file_name().map(|name| name.to_string_lossy().into_owned()),
        content_type: content_type.to_string(),
    })
}

fn load_api_config() -> Result<(ApiConfig, PathBuf)> {
    let config_path = get_config_path();
    let mut builder = Config::builder();
    if config_path.exists() {
        builder = builder.add_source(File::from(config_path.clone()));
    } else {
        tracing::warn!(
            "Config file not found at {:?}. Run catat-api once or create it.",
            config_path
        );
    }

    let config: ApiConfig = builder
        .add_source(
            Environment::with_prefix("CATAT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;
    Ok((config, config_path))
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("catat").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
