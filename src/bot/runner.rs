use crate::bot::error_reporter;
use crate::bot::handlers::{InboundEvent, UpdateDispatcher};
use crate::bot::session::SessionStore;
use crate::bot::transport::TelegramTransport;
use crate::config::{Credentials, Settings};
use crate::translate::{DeeplTranslator, LanguageCatalog, Translator};
use anyhow::Context;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Validate both secrets, then run the bot.
///
/// Neither Telegram nor DeepL is contacted when a secret is missing.
///
/// # Errors
///
/// Returns the `ConfigurationError` for a missing secret, or any error from
/// [`run_bot`].
pub async fn run(settings: Arc<Settings>) -> anyhow::Result<()> {
    let credentials = settings
        .credentials()
        .context("Provide TELEGRAM_TOKEN and DEEPL_API_KEY via the environment or config/local.toml")?;
    run_bot(settings, credentials).await
}

/// Run the Telegram receive loop until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the bot identity cannot be resolved (invalid token,
/// unreachable API).
pub async fn run_bot(settings: Arc<Settings>, credentials: Credentials) -> anyhow::Result<()> {
    let bot = Bot::new(credentials.telegram_token.clone());

    let translator = init_translator(&settings, &credentials);
    let catalog = Arc::new(LanguageCatalog::load(translator.as_ref()).await);
    let sessions = init_sessions(&settings);

    let dispatcher = Arc::new(UpdateDispatcher::new(
        Arc::new(TelegramTransport::new(bot.clone())),
        translator,
        sessions,
        catalog,
    ));

    let cancel = CancellationToken::new();
    spawn_shutdown_watcher(cancel.clone());

    let me = bot.get_me().await?;
    info!(
        "Start listening for @{}",
        me.user.username.as_deref().unwrap_or("unknown")
    );
    info!("Bot is up and running. Press Ctrl-C to exit.");

    Dispatcher::builder(bot, setup_handler())
        .dependencies(dptree::deps![dispatcher, cancel.clone()])
        .default_handler(|upd| async move {
            debug!("Ignoring unsupported update: {:?}", upd.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update listener",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    cancel.cancel();
    info!("Receive loop stopped.");
    Ok(())
}

fn init_translator(settings: &Settings, credentials: &Credentials) -> Arc<dyn Translator> {
    let translator = match settings.deepl_api_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            DeeplTranslator::with_base_url(credentials.deepl_api_key.clone(), url.to_string())
        }
        _ => DeeplTranslator::new(credentials.deepl_api_key.clone()),
    };
    info!("DeepL translator initialized ({}).", translator.base_url());
    Arc::new(translator)
}

fn init_sessions(settings: &Settings) -> SessionStore {
    info!(
        "Initializing SessionStore (default: {}, idle: {}s, max_size: {})",
        settings.default_target_lang, settings.session_idle_secs, settings.session_max_capacity
    );
    SessionStore::new(
        &settings.default_target_lang,
        settings.session_idle_secs,
        settings.session_max_capacity,
    )
}

/// Cancel in-flight dispatches once Ctrl-C arrives
fn spawn_shutdown_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupt received, cancelling in-flight updates."),
            Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
        }
        cancel.cancel();
    });
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.text().is_some())
                .endpoint(handle_message),
        )
}

async fn handle_message(
    msg: Message,
    dispatcher: Arc<UpdateDispatcher>,
    cancel: CancellationToken,
) -> Result<(), teloxide::RequestError> {
    if let Some(event) = InboundEvent::from_message(&msg) {
        dispatch(&dispatcher, event, &cancel).await;
    }
    respond(())
}

async fn handle_callback(
    q: CallbackQuery,
    dispatcher: Arc<UpdateDispatcher>,
    cancel: CancellationToken,
) -> Result<(), teloxide::RequestError> {
    dispatch(&dispatcher, InboundEvent::from_callback(&q), &cancel).await;
    respond(())
}

async fn dispatch(dispatcher: &UpdateDispatcher, event: InboundEvent, cancel: &CancellationToken) {
    let chat_id = event.chat_id();
    if let Err(e) = dispatcher.handle(event, cancel).await {
        debug!(chat_id = chat_id.0, "Dispatch failed");
        error_reporter::report(&e);
    }
}
