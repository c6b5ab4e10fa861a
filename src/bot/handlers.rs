use crate::bot::session::SessionStore;
use crate::bot::transport::{ChatTransport, TransportError};
use crate::bot::views::{self, LanguageMenu};
use crate::translate::{LanguageCatalog, TranslateError, Translator};
use std::future::Future;
use std::sync::Arc;
use teloxide::types::{CallbackQuery, ChatId, Message};
use teloxide::utils::command::BotCommands;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Supported commands for the bot
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Start the bot
    Start,
    /// Get help
    Help,
    /// Set target language
    SetTarget,
    /// Show usage
    Usage,
}

impl Command {
    /// Every command, in menu order
    pub const ALL: [Self; 4] = [Self::Start, Self::Help, Self::SetTarget, Self::Usage];

    /// The slash-prefixed keyword users type
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Start => "/start",
            Self::Help => "/help",
            Self::SetTarget => "/settarget",
            Self::Usage => "/usage",
        }
    }

    /// Recognise a command when the whole text equals a keyword, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxide_translator::bot::handlers::Command;
    ///
    /// assert_eq!(Command::from_text("/SetTarget"), Some(Command::SetTarget));
    /// assert_eq!(Command::from_text("/start now"), None);
    /// ```
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        Self::ALL.into_iter().find(|cmd| cmd.keyword() == lowered)
    }
}

/// One unit of inbound work from the messaging platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Text that matches a known command
    Command {
        /// Chat the command came from
        chat_id: ChatId,
        /// Recognised command
        command: Command,
    },
    /// Any other text, to be translated
    Text {
        /// Chat the text came from
        chat_id: ChatId,
        /// Text to translate
        text: String,
    },
    /// A press on an inline keyboard button
    Callback {
        /// Identifier used to acknowledge the press
        callback_id: String,
        /// Chat the keyboard belongs to
        chat_id: ChatId,
        /// Payload attached to the pressed button
        payload: Option<String>,
    },
}

impl InboundEvent {
    /// Classify a text message
    #[must_use]
    pub fn from_text(chat_id: ChatId, text: &str) -> Self {
        match Command::from_text(text) {
            Some(command) => Self::Command { chat_id, command },
            None => Self::Text {
                chat_id,
                text: text.to_string(),
            },
        }
    }

    /// Classify a Telegram message; `None` for messages without text
    #[must_use]
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.text().map(|text| Self::from_text(msg.chat.id, text))
    }

    /// Convert a Telegram callback query.
    ///
    /// Falls back to the presser's private chat when the message carrying the
    /// keyboard is no longer available.
    #[must_use]
    pub fn from_callback(q: &CallbackQuery) -> Self {
        let chat_id = q
            .message
            .as_ref()
            .map_or_else(|| ChatId(q.from.id.0.cast_signed()), |msg| msg.chat().id);

        Self::Callback {
            callback_id: q.id.to_string(),
            chat_id,
            payload: q.data.clone(),
        }
    }

    /// Chat the event belongs to
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        match self {
            Self::Command { chat_id, .. }
            | Self::Text { chat_id, .. }
            | Self::Callback { chat_id, .. } => *chat_id,
        }
    }
}

/// Errors that abort the handling of a single event
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The messaging platform rejected a call
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The translation service failed
    #[error("Translation failed: {0}")]
    Translation(#[from] TranslateError),
    /// The shared cancellation signal fired
    #[error("Dispatch cancelled")]
    Cancelled,
}

/// Await `fut` unless `cancel` fires first
async fn until_cancelled<T, E, F>(cancel: &CancellationToken, fut: F) -> Result<T, DispatchError>
where
    F: Future<Output = Result<T, E>>,
    DispatchError: From<E>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DispatchError::Cancelled),
        res = fut => res.map_err(DispatchError::from),
    }
}

/// Routes inbound events to replies, translations and language changes
pub struct UpdateDispatcher {
    transport: Arc<dyn ChatTransport>,
    translator: Arc<dyn Translator>,
    sessions: SessionStore,
    catalog: Arc<LanguageCatalog>,
    menu: LanguageMenu,
}

impl UpdateDispatcher {
    /// Create a dispatcher over both collaborators
    #[must_use]
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        translator: Arc<dyn Translator>,
        sessions: SessionStore,
        catalog: Arc<LanguageCatalog>,
    ) -> Self {
        Self {
            transport,
            translator,
            sessions,
            catalog,
            menu: LanguageMenu::standard(),
        }
    }

    /// Per-chat language selections
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound event.
    ///
    /// # Errors
    ///
    /// Returns the first transport or translation failure, or
    /// `DispatchError::Cancelled` if `cancel` fires while waiting on a
    /// collaborator. Usage query failures are reported to the user instead.
    pub async fn handle(
        &self,
        event: InboundEvent,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        until_cancelled(cancel, self.transport.register_commands()).await?;

        match event {
            InboundEvent::Command { chat_id, command } => {
                self.handle_command(chat_id, command, cancel).await
            }
            InboundEvent::Text { chat_id, text } => {
                self.handle_translation(chat_id, &text, cancel).await
            }
            InboundEvent::Callback {
                callback_id,
                chat_id,
                payload,
            } => {
                self.handle_language_choice(&callback_id, chat_id, payload, cancel)
                    .await
            }
        }
    }

    async fn handle_command(
        &self,
        chat_id: ChatId,
        command: Command,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        debug!(chat_id = chat_id.0, ?command, "Handling command");

        match command {
            Command::Start => self.reply(chat_id, views::WELCOME_TEXT, cancel).await,
            Command::Help => self.reply(chat_id, views::HELP_TEXT, cancel).await,
            Command::SetTarget => {
                until_cancelled(
                    cancel,
                    self.transport
                        .send_menu(chat_id, views::SELECT_LANGUAGE_TEXT, &self.menu),
                )
                .await
            }
            Command::Usage => {
                let text = match until_cancelled(cancel, self.translator.usage()).await {
                    Ok(usage) => views::usage_message(&usage),
                    Err(DispatchError::Translation(e)) => {
                        warn!(chat_id = chat_id.0, "Usage query failed: {e}");
                        views::usage_error_message(&e)
                    }
                    Err(e) => return Err(e),
                };
                self.reply(chat_id, &text, cancel).await
            }
        }
    }

    async fn handle_translation(
        &self,
        chat_id: ChatId,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        let target_lang = self.sessions.target_lang(chat_id).await;
        let translation =
            until_cancelled(cancel, self.translator.translate(text, &target_lang)).await?;

        info!(
            chat_id = chat_id.0,
            target_lang = %target_lang,
            source_lang = ?translation.detected_source_language,
            "Translated message"
        );

        self.reply(chat_id, &translation.text, cancel).await
    }

    async fn handle_language_choice(
        &self,
        callback_id: &str,
        chat_id: ChatId,
        payload: Option<String>,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        until_cancelled(cancel, self.transport.answer_callback(callback_id)).await?;

        let Some(code) = payload else {
            debug!(chat_id = chat_id.0, "Callback without payload ignored");
            return Ok(());
        };

        if !self.is_supported(&code) {
            warn!(chat_id = chat_id.0, code = %code, "Rejected unknown language code");
            return self
                .reply(chat_id, &views::unsupported_language_message(&code), cancel)
                .await;
        }

        self.sessions.set_target_lang(chat_id, &code).await;
        let name = views::language_display_name(&self.catalog, &code);
        info!(chat_id = chat_id.0, code = %code, "Target language set to {name}");

        self.reply(chat_id, &views::language_set_message(&name), cancel)
            .await
    }

    fn is_supported(&self, code: &str) -> bool {
        self.menu.payloads().any(|p| p == code) || self.catalog.contains(code)
    }

    async fn reply(
        &self,
        chat_id: ChatId,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        until_cancelled(cancel, self.transport.send_text(chat_id, text)).await
    }
}
