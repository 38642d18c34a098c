use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default chat-completions endpoint used when `SUMMARIZER_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model identifier used when `SUMMARIZER_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

/// Default directory for storing uploaded files.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docsum server.
///
/// Every field is optional: without `SUMMARIZER_API_KEY` the service runs
/// fully locally, producing deterministic fallback summaries.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Credential for the remote summarization service; its absence is the
    /// single switch between remote and fully-local operation.
    pub summarizer_api_key: Option<String>,
    /// Override for the chat-completions endpoint URL.
    pub summarizer_api_url: Option<String>,
    /// Override for the model identifier sent with each request.
    pub summarizer_model: Option<String>,
    /// Directory where uploaded files are stored.
    pub upload_dir: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Optional override for the single-pass size threshold (characters).
    pub single_pass_threshold: Option<usize>,
    /// Optional override for the maximum chunk size (characters).
    pub chunk_size: Option<usize>,
    /// Optional override for the chunk overlap (characters).
    pub chunk_overlap: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            summarizer_api_key: load_env_optional("SUMMARIZER_API_KEY"),
            summarizer_api_url: load_env_optional("SUMMARIZER_API_URL"),
            summarizer_model: load_env_optional("SUMMARIZER_MODEL"),
            upload_dir: load_env_optional("UPLOAD_DIR"),
            server_port: parse_optional("SERVER_PORT")?,
            single_pass_threshold: parse_optional("SUMMARIZER_SINGLE_PASS_THRESHOLD")?,
            chunk_size: parse_optional("SUMMARIZER_CHUNK_SIZE")?,
            chunk_overlap: parse_optional("SUMMARIZER_CHUNK_OVERLAP")?,
        })
    }

    /// Effective chat-completions endpoint URL.
    pub fn api_url(&self) -> &str {
        self.summarizer_api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Effective model identifier.
    pub fn model(&self) -> &str {
        self.summarizer_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Effective upload directory.
    pub fn upload_dir(&self) -> &str {
        self.upload_dir.as_deref().unwrap_or(DEFAULT_UPLOAD_DIR)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        api_url = %config.api_url(),
        model = %config.model(),
        upload_dir = %config.upload_dir(),
        server_port = ?config.server_port,
        remote_enabled = config.summarizer_api_key.is_some(),
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
