//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_MODEL_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_VIDEO_SEARCH_URL: &str = "https://www.youtube.com/results";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub static_dir: PathBuf,
    pub genai_api_key: Option<String>,
    pub model_api_base: String,
    pub quiz_model: String,
    pub video_search_url: String,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server and Database Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "127.0.0.1:8000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = var_or("DATABASE_URL", "sqlite://records.db");
        if !database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue(
                "DATABASE_URL".to_string(),
                format!("'{}' is not a sqlite URL", database_url),
            ));
        }

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let static_dir = PathBuf::from(var_or("STATIC_DIR", "./static"));

        // --- Load API Keys (as optional) ---
        let genai_api_key = lookup("GENAI_API_KEY").filter(|key| !key.trim().is_empty());

        // --- Load Adapter-specific Settings ---
        let model_api_base = var_or("MODEL_API_BASE", DEFAULT_MODEL_API_BASE);
        let quiz_model = var_or("QUIZ_MODEL", "gemini-2.5-flash");
        let video_search_url = var_or("VIDEO_SEARCH_URL", DEFAULT_VIDEO_SEARCH_URL);
        let cors_origin = var_or("CORS_ORIGIN", "http://127.0.0.1:8000");

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            static_dir,
            genai_api_key,
            model_api_base,
            quiz_model,
            video_search_url,
            cors_origin,
        })
    }

    /// The model API key, which the server cannot start without.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.genai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("GENAI_API_KEY".to_string()))
    }
}
