use dotenvy::dotenv;
use oxide_translator::bot::runner::run;
use oxide_translator::config::Settings;
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting sensitive data
struct RedactionPatterns {
    token1: Regex,
    token2: Regex,
    token3: Regex,
    deepl_header: Regex,
    deepl_env: Regex,
    deepl_free_key: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token1: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)(/['\s]*)")?,
            token2: Regex::new(r"([0-9]{8,10}:[A-Za-z0-9_-]{35})")?,
            token3: Regex::new(r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+")?,
            deepl_header: Regex::new(r"DeepL-Auth-Key [^\s'\x22]+")?,
            deepl_env: Regex::new(r"DEEPL_API_KEY=[^\s&]+")?,
            deepl_free_key: Regex::new(r"[0-9a-fA-F-]{36}:fx")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let mut output = input.to_string();
        output = self
            .token1
            .replace_all(&output, "$1[TELEGRAM_TOKEN]$3")
            .to_string();
        output = self
            .token2
            .replace_all(&output, "[TELEGRAM_TOKEN]")
            .to_string();
        output = self
            .token3
            .replace_all(&output, "$1[TELEGRAM_TOKEN]")
            .to_string();
        output = self
            .deepl_header
            .replace_all(&output, "DeepL-Auth-Key [MASKED]")
            .to_string();
        output = self
            .deepl_env
            .replace_all(&output, "DEEPL_API_KEY=[MASKED]")
            .to_string();
        output = self
            .deepl_free_key
            .replace_all(&output, "[DEEPL_KEY]")
            .to_string();
        output
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // Report the original length; the redacted text may differ in size.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    const fn new(make_inner: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            make_inner,
            patterns,
        }
    }
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Redaction must be ready before the first log line
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting Oxide Translator bot...");

    let settings = init_settings();

    if let Err(e) = run(settings).await {
        error!("Bot terminated: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter::new(io::stderr, patterns);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_telegram_token_in_url() -> Result<(), regex::Error> {
        let patterns = RedactionPatterns::new()?;
        let line = "error sending request for url (https://api.telegram.org/bot123456789:AAEhBP0av28bMxyzABCDEFGHIJKLMNOPQRS/getMe)";
        let redacted = patterns.redact(line);
        assert!(redacted.contains("/bot[TELEGRAM_TOKEN]/getMe"));
        assert!(!redacted.contains("AAEhBP0av28b"));
        Ok(())
    }

    #[test]
    fn test_redacts_deepl_keys() -> Result<(), regex::Error> {
        let patterns = RedactionPatterns::new()?;

        let header = patterns.redact("Authorization: DeepL-Auth-Key abc-123:fx");
        assert_eq!(header, "Authorization: DeepL-Auth-Key [MASKED]");

        let env = patterns.redact("DEEPL_API_KEY=secret-value other=1");
        assert_eq!(env, "DEEPL_API_KEY=[MASKED] other=1");

        let bare = patterns.redact("key 279a2e9d-83b3-c416-7e2d-f721593e42a0:fx rejected");
        assert_eq!(bare, "key [DEEPL_KEY] rejected");
        Ok(())
    }
}
