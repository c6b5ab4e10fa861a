//! Per-chat target language storage
//!
//! Each chat keeps its own translation target. Entries live in a bounded
//! in-memory cache and fall back to the default language once evicted.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use teloxide::types::ChatId;
use tracing::debug;

/// Target language selected by each chat
#[derive(Clone)]
pub struct SessionStore {
    /// chat_id -> language code, evicted after an idle period
    languages: Cache<i64, Arc<str>>,
    /// Language used by chats without a selection
    default_lang: Arc<str>,
}

impl SessionStore {
    /// Creates a new `SessionStore`
    ///
    /// # Arguments
    ///
    /// * `default_lang` - Language code returned for chats without a selection
    /// * `idle_secs` - Seconds without access after which a selection is forgotten
    /// * `max_capacity` - Maximum number of chats remembered
    ///
    /// # Examples
    ///
    /// ```
    /// use oxide_translator::bot::SessionStore;
    ///
    /// let sessions = SessionStore::new("EN-US", 86_400, 10_000);
    /// assert_eq!(sessions.default_lang(), "EN-US");
    /// ```
    #[must_use]
    pub fn new(default_lang: &str, idle_secs: u64, max_capacity: u64) -> Self {
        let languages = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(Duration::from_secs(idle_secs))
            .build();

        Self {
            languages,
            default_lang: Arc::from(default_lang),
        }
    }

    /// Returns the language code currently selected for `chat_id`
    pub async fn target_lang(&self, chat_id: ChatId) -> String {
        self.languages
            .get(&chat_id.0)
            .await
            .unwrap_or_else(|| self.default_lang.clone())
            .to_string()
    }

    /// Overwrites the language selected for `chat_id`
    pub async fn set_target_lang(&self, chat_id: ChatId, code: &str) {
        debug!(chat_id = chat_id.0, code = %code, "Target language updated");
        self.languages.insert(chat_id.0, Arc::from(code)).await;
    }

    /// Language used by chats without a selection
    #[must_use]
    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    /// Returns the current number of chats with a selection
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.languages.entry_count()
    }
}
