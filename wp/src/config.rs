//! Configuration
//!
//! All settings are environment-supplied with defaults, collected once at
//! startup. Nothing re-reads the environment after `Config::from_env()`.

use std::path::PathBuf;

use chrono_tz::Tz;
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generation-oracle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of the Gemini API
    pub base_url: String,
    /// Model name, e.g. "gemini-2.0-flash-lite"
    pub model: String,
    /// API key; absent keys fail at client construction, not at startup,
    /// so read-only commands work without one
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl OracleConfig {
    pub fn get_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .ok_or_else(|| eyre!("GEMINI_API_KEY is not set"))
    }
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub oracle: OracleConfig,
    /// Path to the docstore database file
    pub store_path: PathBuf,
    /// User documents are keyed by this id when no other id is given
    pub default_user_id: String,
    /// IANA timezone name used to decide "today" (and so the current week)
    pub timezone: String,
    /// HTTP listen address
    pub listen_addr: String,
    /// Optional directory of prompt template overrides
    pub prompts_dir: Option<PathBuf>,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weekplan")
        .join(docstore::DEFAULT_DB_FILE)
}

impl Config {
    /// Build configuration from the environment
    pub fn from_env() -> Self {
        let config = Self {
            oracle: OracleConfig {
                base_url: env_or("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com"),
                model: env_or("MODEL_NAME", "gemini-2.0-flash-lite"),
                api_key: std::env::var("GEMINI_API_KEY").ok(),
                timeout_ms: env_or("ORACLE_TIMEOUT_MS", "300000").parse().unwrap_or(300_000),
            },
            store_path: std::env::var("WEEKPLAN_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_store_path()),
            default_user_id: env_or("DEFAULT_USER_ID", "default"),
            timezone: env_or("TIMEZONE", "America/New_York"),
            listen_addr: env_or("LISTEN_ADDR", "0.0.0.0:8080"),
            prompts_dir: std::env::var("PROMPTS_DIR").map(PathBuf::from).ok(),
        };
        debug!(model = %config.oracle.model, timezone = %config.timezone, "Config::from_env: loaded");
        config
    }

    /// Parse the configured timezone name
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| eyre!("Unknown timezone: '{}'", self.timezone))
    }
}
