//! Testing helpers and mock utilities.
//!
//! Provides convenient constructors for mocked transport and translation providers.

use crate::bot::transport::MockChatTransport;
use crate::bot::views::LanguageMenu;
use crate::translate::{Language, MockTranslator, Translation, Usage};
use std::sync::{Arc, Mutex};
use teloxide::types::ChatId;

/// One outbound call recorded by [`mock_transport_recording`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// `send_text`
    Text {
        /// Target chat
        chat_id: i64,
        /// Message text
        text: String,
    },
    /// `send_menu`
    Menu {
        /// Target chat
        chat_id: i64,
        /// Text above the menu
        text: String,
        /// Menu attached to the message
        menu: LanguageMenu,
    },
    /// `answer_callback`
    CallbackAnswer(String),
}

impl Outbound {
    /// Shorthand for an expected text message
    #[must_use]
    pub fn text(chat_id: ChatId, text: &str) -> Self {
        Self::Text {
            chat_id: chat_id.0,
            text: text.to_string(),
        }
    }
}

/// Shared log of outbound calls
pub type OutboundLog = Arc<Mutex<Vec<Outbound>>>;

fn record(log: &OutboundLog, entry: Outbound) {
    if let Ok(mut guard) = log.lock() {
        guard.push(entry);
    }
}

/// Snapshot of everything sent so far
#[must_use]
pub fn sent_messages(log: &OutboundLog) -> Vec<Outbound> {
    log.lock().map(|guard| guard.clone()).unwrap_or_default()
}

/// Create a mock transport that succeeds on every call and records sends.
///
/// `register_commands` is accepted any number of times and not recorded.
#[must_use]
pub fn mock_transport_recording() -> (MockChatTransport, OutboundLog) {
    let log: OutboundLog = Arc::new(Mutex::new(Vec::new()));
    let mut mock = MockChatTransport::new();

    mock.expect_register_commands().returning(|| Ok(()));

    let text_log = Arc::clone(&log);
    mock.expect_send_text().returning(move |chat_id, text| {
        record(&text_log, Outbound::text(chat_id, text));
        Ok(())
    });

    let menu_log = Arc::clone(&log);
    mock.expect_send_menu().returning(move |chat_id, text, menu| {
        record(
            &menu_log,
            Outbound::Menu {
                chat_id: chat_id.0,
                text: text.to_string(),
                menu: menu.clone(),
            },
        );
        Ok(())
    });

    let answer_log = Arc::clone(&log);
    mock.expect_answer_callback().returning(move |id| {
        record(&answer_log, Outbound::CallbackAnswer(id.to_string()));
        Ok(())
    });

    (mock, log)
}

/// Create a mock translator that answers `[<target>] <text>`.
///
/// `usage` reports 0 of 500 000 characters and `target_languages` returns
/// German only.
#[must_use]
pub fn mock_translator_echo() -> MockTranslator {
    let mut mock = MockTranslator::new();

    mock.expect_translate().returning(|text, target_lang| {
        Ok(Translation {
            text: format!("[{target_lang}] {text}"),
            detected_source_language: None,
        })
    });

    mock.expect_usage().returning(|| {
        Ok(Usage {
            character_count: 0,
            character_limit: 500_000,
        })
    });

    mock.expect_target_languages().returning(|| {
        Ok(vec![Language {
            code: "DE".to_string(),
            name: "German".to_string(),
            supports_formality: true,
        }])
    });

    mock
}
