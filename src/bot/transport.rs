//! Outbound side of the messaging platform.
//!
//! The dispatcher only talks to [`ChatTransport`]; [`TelegramTransport`]
//! implements it on top of teloxide.

use crate::bot::handlers::Command;
use crate::bot::views::LanguageMenu;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};
use thiserror::Error;

/// Maximum message length for Telegram with safety margin.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Errors surfaced by the messaging platform
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform rejected the call
    #[error("Telegram API error [{code}]: {message}")]
    Api {
        /// HTTP-style error code
        code: u16,
        /// Description returned by the platform
        message: String,
    },
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
    /// Any other failure (malformed responses, I/O)
    #[error("Transport error: {0}")]
    Other(String),
}

impl From<RequestError> for TransportError {
    fn from(err: RequestError) -> Self {
        match err {
            // Keep the platform's own description without teloxide's prefix
            RequestError::Api(api) => Self::Api {
                code: api_error_code(&api),
                message: api.to_string(),
            },
            err => Self::from_other(err),
        }
    }
}

impl TransportError {
    fn from_other(err: RequestError) -> Self {
        let message = err.to_string();
        match err {
            RequestError::RetryAfter(_) => Self::Api { code: 429, message },
            RequestError::MigrateToChatId(_) => Self::Api { code: 400, message },
            RequestError::Network(_) => Self::Network(message),
            _ => Self::Other(message),
        }
    }
}

fn api_error_code(err: &ApiError) -> u16 {
    match err {
        ApiError::BotBlocked
        | ApiError::BotKicked
        | ApiError::BotKickedFromSupergroup
        | ApiError::UserDeactivated
        | ApiError::CantInitiateConversation
        | ApiError::CantTalkWithBots => 403,
        ApiError::InvalidToken => 401,
        ApiError::TerminatedByOtherGetUpdates => 409,
        _ => 400,
    }
}

/// Operations the dispatcher performs on the messaging platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Publish the bot's command menu
    async fn register_commands(&self) -> Result<(), TransportError>;

    /// Send a plain text message
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError>;

    /// Send a message carrying the language selection menu
    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        menu: &LanguageMenu,
    ) -> Result<(), TransportError>;

    /// Acknowledge a button press so the client stops its loading indicator
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}

/// [`ChatTransport`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Create a transport sending through `bot`
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn register_commands(&self) -> Result<(), TransportError> {
        self.bot.set_my_commands(Command::bot_commands()).await?;
        Ok(())
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        for part in split_message(text, TELEGRAM_MESSAGE_LIMIT) {
            self.bot.send_message(chat_id, part).await?;
        }
        Ok(())
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        menu: &LanguageMenu,
    ) -> Result<(), TransportError> {
        self.bot
            .send_message(chat_id, text)
            .reply_markup(menu.to_inline_keyboard())
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.bot
            .answer_callback_query(callback_query_id(callback_id))
            .await?;
        Ok(())
    }
}

fn callback_query_id(id: &str) -> CallbackQueryId {
    CallbackQueryId(id.to_string())
}

/// Split `text` into parts of at most `limit` UTF-16 code units (the unit
/// Telegram counts message length in), preferring to break after a newline.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    // A surrogate pair must always fit into one part
    let limit = limit.max(2);
    let mut parts = Vec::new();
    let mut rest = text;

    while utf16_len(rest) > limit {
        let hard_cut = utf16_boundary(rest, limit);
        let cut = rest[..hard_cut]
            .rfind('\n')
            .map_or(hard_cut, |idx| idx + 1);
        parts.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte index of the first char that would exceed `limit` code units
fn utf16_boundary(text: &str, limit: usize) -> usize {
    let mut units = 0;
    for (idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > limit {
            return idx;
        }
    }
    text.len()
}
