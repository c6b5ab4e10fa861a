#![deny(missing_docs)]
//! Oxide Translator
//!
//! A Telegram bot that relays free text through the DeepL translation API
//! and lets every chat pick its own target language.

/// Telegram bot implementation
pub mod bot;
/// Configuration management
pub mod config;
/// Translation providers and client
pub mod translate;

#[cfg(test)]
pub mod testing;
