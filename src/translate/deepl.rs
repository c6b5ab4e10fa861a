//! DeepL v2 REST client
//!
//! Free keys (suffix `:fx`) and Pro keys are served from different hosts.

use crate::translate::http_utils;
use crate::translate::{Language, TranslateError, Translation, Translator, Usage};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Endpoint used by DeepL API Free keys
pub const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com";
/// Endpoint used by DeepL API Pro keys
pub const DEEPL_PRO_API_URL: &str = "https://api.deepl.com";

#[derive(Deserialize, Debug)]
struct TranslateResponse {
    translations: Vec<TranslationEntry>,
}

#[derive(Deserialize, Debug)]
struct TranslationEntry {
    text: String,
    detected_source_language: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LanguageEntry {
    language: String,
    name: String,
    #[serde(default)]
    supports_formality: bool,
}

#[derive(Deserialize, Debug)]
struct UsageResponse {
    #[serde(default)]
    character_count: u64,
    #[serde(default)]
    character_limit: u64,
}

/// Translation provider backed by the DeepL v2 REST API
pub struct DeeplTranslator {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl DeeplTranslator {
    /// Create a provider for `api_key`, picking the Free or Pro endpoint from the key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        let base_url = default_base_url(&api_key).to_string();
        Self::with_base_url(api_key, base_url)
    }

    /// Create a provider that talks to an explicit endpoint
    #[must_use]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http_client: http_utils::create_http_client(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint this provider sends requests to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Free keys carry the `:fx` suffix.
#[must_use]
pub fn default_base_url(api_key: &str) -> &'static str {
    if api_key.trim().ends_with(":fx") {
        DEEPL_FREE_API_URL
    } else {
        DEEPL_PRO_API_URL
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
    ) -> Result<Translation, TranslateError> {
        let body = json!({
            "text": [text],
            "target_lang": target_lang,
        });

        let request = self
            .http_client
            .post(self.url("/v2/translate"))
            .header("Authorization", self.auth_header())
            .json(&body);

        let response: TranslateResponse = http_utils::send_json(request).await?;
        let entry = response
            .translations
            .into_iter()
            .next()
            .ok_or(TranslateError::EmptyResult)?;

        debug!(
            target_lang = %target_lang,
            detected = ?entry.detected_source_language,
            chars = text.chars().count(),
            "Translation completed"
        );

        Ok(Translation {
            text: entry.text,
            detected_source_language: entry.detected_source_language,
        })
    }

    async fn target_languages(&self) -> Result<Vec<Language>, TranslateError> {
        let request = self
            .http_client
            .get(self.url("/v2/languages"))
            .query(&[("type", "target")])
            .header("Authorization", self.auth_header());

        let entries: Vec<LanguageEntry> = http_utils::send_json(request).await?;
        Ok(entries
            .into_iter()
            .map(|e| Language {
                code: e.language,
                name: e.name,
                supports_formality: e.supports_formality,
            })
            .collect())
    }

    async fn usage(&self) -> Result<Usage, TranslateError> {
        let request = self
            .http_client
            .get(self.url("/v2/usage"))
            .header("Authorization", self.auth_header());

        let response: UsageResponse = http_utils::send_json(request).await?;
        Ok(Usage {
            character_count: response.character_count,
            character_limit: response.character_limit,
        })
    }
}
