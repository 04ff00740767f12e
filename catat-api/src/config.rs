use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_MAX_AUDIO_SIZE_MB: u64 = 25;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const DEFAULT_CONFIG: &str = r#"
[api_keys]
# groq_api_key = "your-groq-key"
# anthropic_api_key = "your-anthropic-key"

[cors]
allowed_origins = ["http://localhost:5173", "http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8000

[models]
# transcription = "whisper-large-v3"
# structurer = "mixtral-8x7b-32768"
# writer = "claude-sonnet-4-20250514"

[upload]
max_audio_size_mb = 25
allowed_audio_types = ["audio/webm", "audio/wav", "audio/mp3", "audio/mpeg", "audio/flac", "audio/m4a"]

[upstream]
timeout_secs = 120
"#;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub api_keys: Option<ApiKeysConfig>,
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    pub models: Option<ModelsConfig>,
    pub upload: Option<UploadConfig>,
    pub upstream: Option<UpstreamConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_keys: None,
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            }),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            }),
            models: None,
            upload: Some(UploadConfig::default()),
            upstream: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiKeysConfig {
    pub groq_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Model overrides; unset entries use the agents' defaults
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ModelsConfig {
    pub transcription: Option<String>,
    pub structurer: Option<String>,
    pub writer: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    pub max_audio_size_mb: u64,
    pub allowed_audio_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_audio_size_mb: DEFAULT_MAX_AUDIO_SIZE_MB,
            allowed_audio_types: [
                "audio/webm",
                "audio/wav",
                "audio/mp3",
                "audio/mpeg",
                "audio/flac",
                "audio/m4a",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpstreamConfig {
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    /// Read a config file, then apply `CATAT__SECTION__KEY` environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(
                Environment::with_prefix("CATAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn upload(&self) -> UploadConfig {
        self.upload.clone().unwrap_or_default()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(
            self.upstream
                .as_ref()
                .map(|upstream| upstream.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn models(&self) -> ModelsConfig {
        self.models.clone().unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("catat").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
