//! Translation providers and client
//!
//! Defines the interface the bot consumes from a translation service and the
//! DeepL implementation of it.

/// DeepL REST API provider
pub mod deepl;
mod http_utils;
/// Supported target languages fetched at startup
pub mod languages;

pub use deepl::DeeplTranslator;
pub use languages::LanguageCatalog;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during translation operations
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The service rejected the authentication key (403)
    #[error("Authorization failed: {0}")]
    Authorization(String),
    /// The monthly character quota is exhausted (456)
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    /// Too many requests (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),
    /// Any other non-success response
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error text returned by the service
        message: String,
    },
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    Json(String),
    /// The service answered without any translation
    #[error("Translation service returned no result")]
    EmptyResult,
}

/// A translated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Translated text
    pub text: String,
    /// Language the service detected in the input
    pub detected_source_language: Option<String>,
}

/// A target language offered by the translation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code, e.g. `EN-US`
    pub code: String,
    /// Human-readable name, e.g. `English (American)`
    pub name: String,
    /// Whether the formality option is available
    #[serde(default)]
    pub supports_formality: bool,
}

/// Character accounting for the current billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Characters translated so far
    pub character_count: u64,
    /// Characters allowed in the period
    pub character_limit: u64,
}

impl Usage {
    /// Characters left before the limit is reached
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.character_limit.saturating_sub(self.character_count)
    }
}

/// Interface for translation services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_lang`, detecting the source language
    async fn translate(&self, text: &str, target_lang: &str)
        -> Result<Translation, TranslateError>;

    /// List the languages texts can be translated into
    async fn target_languages(&self) -> Result<Vec<Language>, TranslateError>;

    /// Query character usage for the current period
    async fn usage(&self) -> Result<Usage, TranslateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_remaining() {
        let usage = Usage {
            character_count: 1_200,
            character_limit: 500_000,
        };
        assert_eq!(usage.remaining(), 498_800);
    }

    #[test]
    fn test_usage_remaining_saturates() {
        let usage = Usage {
            character_count: 600,
            character_limit: 500,
        };
        assert_eq!(usage.remaining(), 0);
    }
}
