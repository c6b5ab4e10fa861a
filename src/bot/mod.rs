/// Logging of failed dispatches
pub mod error_reporter;
/// Command parsing and update dispatching
pub mod handlers;
/// Telegram runtime entrypoint
pub mod runner;
/// Per-chat target language storage
pub mod session;
/// Outbound messaging abstraction and its Telegram implementation
pub mod transport;
/// View layer for UI components (keyboards, messages)
pub mod views;

pub use handlers::{DispatchError, InboundEvent, UpdateDispatcher};
pub use session::SessionStore;
