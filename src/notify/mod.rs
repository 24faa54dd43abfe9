//! Notification side-channel.
//!
//! # Data Flow
//! ```text
//! POST /api/telegram/send {message}
//!     → handlers.rs (payload validation)
//!     → sanitize.rs (trim, strip control characters, keep newlines)
//!     → telegram.rs (single sendMessage call, or no-op when unconfigured)
//!     → {success} / {error}
//! ```
//!
//! # Design Decisions
//! - An unconfigured provider is a success with no network call
//! - A configured provider that rejects the message is a hard failure
//! - At most one delivery attempt per call

pub mod handlers;
pub mod sanitize;
pub mod telegram;

pub use handlers::router;
pub use sanitize::{prepare, sanitize};
pub use telegram::{ChatIdsOutcome, ChatSummary, NotifyError, SendOutcome, TelegramNotifier};
