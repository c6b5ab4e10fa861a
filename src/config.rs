//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and validates
//! the two secrets the bot cannot start without.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating the loaded configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required secret is absent or blank
    #[error("Required secret `{0}` is missing or empty")]
    MissingSecret(&'static str),
}

/// Application settings loaded from config files and environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: Option<String>,
    /// DeepL authentication key
    pub deepl_api_key: Option<String>,
    /// Overrides the DeepL endpoint derived from the key
    pub deepl_api_url: Option<String>,

    /// Target language for chats that never picked one
    #[serde(default = "default_target_lang")]
    pub default_target_lang: String,
    /// Idle time after which a chat's language choice is forgotten
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// Maximum number of chats whose language choice is remembered
    #[serde(default = "default_session_max_capacity")]
    pub session_max_capacity: u64,
}

fn default_target_lang() -> String {
    DEFAULT_TARGET_LANG.to_string()
}

const fn default_session_idle_secs() -> u64 {
    SESSION_IDLE_SECS
}

const fn default_session_max_capacity() -> u64 {
    SESSION_MAX_CAPACITY
}

/// Validated secrets required to talk to both collaborators
#[derive(Clone)]
pub struct Credentials {
    /// Telegram Bot API token
    pub telegram_token: String,
    /// DeepL authentication key
    pub deepl_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("telegram_token", &"[MASKED]")
            .field("deepl_api_key", &"[MASKED]")
            .finish()
    }
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use oxide_translator::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Checks that both secrets are present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingSecret` naming the first secret
    /// that is absent, empty or whitespace-only.
    pub fn credentials(&self) -> Result<Credentials, ConfigurationError> {
        let telegram_token = non_blank(self.telegram_token.as_deref())
            .ok_or(ConfigurationError::MissingSecret("telegram_token"))?;
        let deepl_api_key = non_blank(self.deepl_api_key.as_deref())
            .ok_or(ConfigurationError::MissingSecret("deepl_api_key"))?;

        Ok(Credentials {
            telegram_token: telegram_token.to_string(),
            deepl_api_key: deepl_api_key.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the layered configuration used by [`Settings::new`].
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg. `APP__DEFAULT_TARGET_LANG=DE ./target/app`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE env vars map onto snake_case keys; empty values count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Default target language (DeepL code)
pub const DEFAULT_TARGET_LANG: &str = "EN-US";
/// Default idle lifetime of a chat's language choice (24 hours)
pub const SESSION_IDLE_SECS: u64 = 86_400;
/// Default number of chats tracked by the session store
pub const SESSION_MAX_CAPACITY: u64 = 100_000;
/// Default HTTP timeout for translation requests
pub const TRANSLATION_HTTP_TIMEOUT_SECS: u64 = 30;

/// Get translation HTTP timeout from env or default.
///
/// Environment variable: `TRANSLATION_HTTP_TIMEOUT_SECS`.
#[must_use]
pub fn get_translation_http_timeout_secs() -> u64 {
    std::env::var("TRANSLATION_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(TRANSLATION_HTTP_TIMEOUT_SECS)
}
