//! Operator-facing reporting of failed dispatches.
//!
//! Failures are written to the log only. The end user is not notified and
//! the bot keeps serving subsequent updates.

use crate::bot::handlers::DispatchError;
use crate::bot::transport::TransportError;
use std::fmt;
use tracing::{debug, error};

/// Classification of a dispatch failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReport {
    /// The messaging platform rejected a call
    Api {
        /// Error code returned by the platform
        code: u16,
        /// Description returned by the platform
        message: String,
    },
    /// Anything else, by its textual representation
    Unclassified(String),
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { code, message } => write!(f, "Telegram API Error:\n[{code}]\n{message}"),
            Self::Unclassified(text) => f.write_str(text),
        }
    }
}

/// Sort a failure into API errors and everything else
#[must_use]
pub fn classify(err: &DispatchError) -> ErrorReport {
    match err {
        DispatchError::Transport(TransportError::Api { code, message }) => ErrorReport::Api {
            code: *code,
            message: message.clone(),
        },
        other => ErrorReport::Unclassified(other.to_string()),
    }
}

/// Log a failed dispatch and return its classification
pub fn report(err: &DispatchError) -> ErrorReport {
    let report = classify(err);
    if matches!(err, DispatchError::Cancelled) {
        debug!("Dispatch aborted by shutdown");
    } else {
        error!("{report}");
    }
    report
}
