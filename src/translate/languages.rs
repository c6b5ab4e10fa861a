//! Supported target languages
//!
//! The list is fetched once at startup and stays read-only for the lifetime
//! of the process.

use crate::translate::{Language, Translator};
use std::collections::HashMap;
use tracing::{info, warn};

/// Read-only lookup of the target languages offered by the translation service
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    by_code: HashMap<String, Language>,
}

impl LanguageCatalog {
    /// Build a catalog from an already fetched list
    #[must_use]
    pub fn new(languages: Vec<Language>) -> Self {
        let by_code = languages
            .into_iter()
            .map(|lang| (lang.code.to_uppercase(), lang))
            .collect();
        Self { by_code }
    }

    /// Fetch the list from `translator`.
    ///
    /// A failed fetch is logged and yields an empty catalog; lookups then
    /// fall back to the caller's defaults.
    pub async fn load(translator: &dyn Translator) -> Self {
        match translator.target_languages().await {
            Ok(languages) => {
                info!("Loaded {} supported target languages.", languages.len());
                Self::new(languages)
            }
            Err(e) => {
                warn!("Failed to fetch supported target languages: {e}");
                Self::default()
            }
        }
    }

    /// Look up a language by code (case-insensitive)
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Language> {
        self.by_code.get(&code.to_uppercase())
    }

    /// Whether `code` is offered by the service
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Display name for `code`, if known
    #[must_use]
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(|lang| lang.name.as_str())
    }

    /// Number of known languages
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether no languages are known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
