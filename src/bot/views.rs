//! View layer for bot UI components
//!
//! Contains canned texts, the language menu and message formatters.

use crate::translate::{LanguageCatalog, TranslateError, Usage};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Reply to `/start`
pub const WELCOME_TEXT: &str =
    "Welcome to the translation bot! 🤖\nTo set your target language enter /settarget: ";

/// Reply to `/help`
pub const HELP_TEXT: &str =
    "🗺️\nThis bot translates any text into carefully selected 12 languages.\nTo start, type /start.";

/// Prompt shown above the language menu
pub const SELECT_LANGUAGE_TEXT: &str = "Select your target language:";

/// Buttons per menu row
pub const MENU_COLUMNS: usize = 3;

/// Languages offered in the selection menu: (button label, language code)
pub const MENU_LANGUAGES: [(&str, &str); 12] = [
    ("English 🇺🇸", "EN-US"),
    ("Czech 🇨🇿", "CS"),
    ("French 🇫🇷", "FR"),
    ("German 🇩🇪", "DE"),
    ("Spanish 🇪🇸", "ES"),
    ("Italian 🇮🇹", "IT"),
    ("Swedish 🇸🇪", "SV"),
    ("Russian 🇷🇺", "RU"),
    ("Ukrainian 🇺🇦", "UK"),
    ("Latvian 🇱🇻", "LV"),
    ("Lithuanian 🇱🇹", "LT"),
    ("Polish 🇵🇱", "PL"),
];

/// One button of the language menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    /// Text shown on the button
    pub label: String,
    /// Callback payload sent back when pressed
    pub payload: String,
}

/// Inline button grid offering target languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMenu {
    /// Button rows, top to bottom
    pub rows: Vec<Vec<MenuButton>>,
}

impl LanguageMenu {
    /// The fixed 12-language menu in rows of [`MENU_COLUMNS`]
    #[must_use]
    pub fn standard() -> Self {
        let rows = MENU_LANGUAGES
            .chunks(MENU_COLUMNS)
            .map(|row| {
                row.iter()
                    .map(|(label, code)| MenuButton {
                        label: (*label).to_string(),
                        payload: (*code).to_string(),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Every callback payload the menu can produce
    pub fn payloads(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.payload.as_str())
    }

    /// Render as a Telegram inline keyboard
    #[must_use]
    pub fn to_inline_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(self.rows.iter().map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.payload.clone()))
                .collect::<Vec<_>>()
        }))
    }
}

/// Menu label for a language code, if the menu offers it
#[must_use]
pub fn menu_label(code: &str) -> Option<&'static str> {
    MENU_LANGUAGES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(label, _)| *label)
}

/// Human-readable name for a language code.
///
/// Prefers the name reported by the translation service, then the menu
/// label, then the raw code.
#[must_use]
pub fn language_display_name(catalog: &LanguageCatalog, code: &str) -> String {
    catalog
        .name_of(code)
        .or_else(|| menu_label(code))
        .unwrap_or(code)
        .to_string()
}

/// Confirmation sent after a language was selected
#[must_use]
pub fn language_set_message(name: &str) -> String {
    format!("Target language set to {name}. You can now send text to translate.")
}

/// Reply for a callback payload that is not a known language
#[must_use]
pub fn unsupported_language_message(code: &str) -> String {
    format!("Unsupported language: {code}")
}

/// Reply to `/usage`
#[must_use]
pub fn usage_message(usage: &Usage) -> String {
    format!(
        "💡 Usage:\n\nCharacter Limit: {}\nCharacter Usage: {}\nCharacters Remaining: {}",
        usage.character_limit,
        usage.character_count,
        usage.remaining()
    )
}

/// Reply to `/usage` when the service could not be queried
#[must_use]
pub fn usage_error_message(err: &TranslateError) -> String {
    format!("Error retrieving usage: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::Language;

    #[test]
    fn test_standard_menu_shape() {
        let menu = LanguageMenu::standard();
        assert_eq!(menu.rows.len(), 4);
        assert!(menu.rows.iter().all(|row| row.len() == MENU_COLUMNS));
        assert_eq!(menu.payloads().count(), 12);
        assert_eq!(menu.rows[0][0].payload, "EN-US");
        assert_eq!(menu.rows[3][2].label, "Polish 🇵🇱");
    }

    #[test]
    fn test_inline_keyboard_matches_menu() {
        let keyboard = LanguageMenu::standard().to_inline_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 4);
        assert_eq!(keyboard.inline_keyboard[1][0].text, "German 🇩🇪");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let catalog = LanguageCatalog::new(vec![Language {
            code: "DE".to_string(),
            name: "German".to_string(),
            supports_formality: true,
        }]);

        assert_eq!(language_display_name(&catalog, "DE"), "German");
        assert_eq!(language_display_name(&catalog, "FR"), "French 🇫🇷");
        assert_eq!(language_display_name(&catalog, "JA"), "JA");
    }

    #[test]
    fn test_usage_error_contains_cause() {
        let err = TranslateError::Authorization("Wrong endpoint".to_string());
        assert_eq!(
            usage_error_message(&err),
            "Error retrieving usage: Authorization failed: Wrong endpoint"
        );
    }
}
