use actix_cors::Cors;
use actix_web::{middleware::from_fn, web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::prelude::*;

use catat_agents::llm::{ClaudeClient, GroqClient, LlmClient};
use catat_agents::{LetterPipeline, LetterStructurer, LetterWriter, WhisperTranscriber};
use catat_api::config::ApiConfig;
use catat_api::{middleware, routes, GenerateAppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

fn build_pipeline(config: &ApiConfig) -> std::io::Result<LetterPipeline> {
    let keys = config.api_keys.as_ref();
    let groq_api_key = keys
        .and_then(|keys| keys.groq_api_key.clone())
        .unwrap_or_default();
    let anthropic_api_key = keys
        .and_then(|keys| keys.anthropic_api_key.clone())
        .unwrap_or_default();

    if groq_api_key.is_empty() {
        tracing::warn!("groq_api_key is not configured, transcription and structuring will fail");
    }
    if anthropic_api_key.is_empty() {
        tracing::warn!("anthropic_api_key is not configured, letter generation will fail");
    }

    let timeout = config.upstream_timeout();
    let models = config.models();

    let mut transcriber =
        WhisperTranscriber::new(groq_api_key.clone(), timeout).map_err(std::io::Error::other)?;
    if let Some(model) = models.transcription {
        transcriber = transcriber.with_model(model);
    }

    let groq: Arc<dyn LlmClient> =
        Arc::new(GroqClient::new(groq_api_key, timeout).map_err(std::io::Error::other)?);
    let mut structurer = LetterStructurer::new(groq);
    if let Some(model) = models.structurer {
        structurer = structurer.with_model(model);
    }

    let claude: Arc<dyn LlmClient> =
        Arc::new(ClaudeClient::new(anthropic_api_key, timeout).map_err(std::io::Error::other)?);
    let mut writer = LetterWriter::new(claude);
    if let Some(model) = models.writer {
        writer = writer.with_model(model);
    }

    Ok(LetterPipeline::new(Arc::new(transcriber), structurer, writer))
}

/// Non-blocking writer for the log file; buffered lines are flushed when the guard drops
fn log_file_writer(log_path: &std::path::Path) -> (NonBlocking, WorkerGuard) {
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(std::path::Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("catat-api.log")),
    );
    tracing_appender::non_blocking(file_appender)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Dropping the guard flushes buffered file logs, so it lives until main returns
    let _log_guard = if let Some(log_path) = args.log_file_path {
        let (non_blocking, guard) = log_file_writer(std::path::Path::new(&log_path));

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        None
    };

    tracing::info!("Catat API starting...");

    // Load config
    let (config, config_path) = ApiConfig::load().map_err(std::io::Error::other)?;
    tracing::info!("Config loaded from {:?}", config_path);

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8000)
    };

    let generate_state = GenerateAppState {
        pipeline: Arc::new(build_pipeline(&config)?),
        upload: config.upload(),
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .expose_headers(vec!["X-Process-Time"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

        App::new()
            .wrap(from_fn(middleware::log_requests))
            .wrap(cors)
            .app_data(web::Data::new(generate_state.clone()))
            .configure(routes)
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Catat API shutting down...");
        handle.stop(true).await;
    });

    server.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_flushed_when_guard_dropped() {
        let dir = std::env::temp_dir().join(format!("catat-api-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let log_path = dir.join("server.log");

        let (mut writer, guard) = log_file_writer(&log_path);
        writer.write_all(b"Catat API shutting down...\n").unwrap();
        drop(guard);

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("Catat API shutting down..."));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
