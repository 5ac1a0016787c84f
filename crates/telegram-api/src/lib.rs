//! Telegram Bot API client library.
//!
//! This crate provides a Rust client for the Telegram Bot API over HTTPS.
//! It supports:
//!
//! - Receiving updates via long polling
//! - Sending text and photo messages
//! - Editing messages in place (inline menus)
//! - Answering callback queries from inline keyboards
//!
//! # Example
//!
//! ```no_run
//! use telegram_api::{ApiConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), telegram_api::TelegramError> {
//! // Connect and verify the token
//! let config = ApiConfig::new("123456:ABC-DEF");
//! let client = TelegramClient::connect(config).await?;
//!
//! // Poll for updates
//! let updates = client.get_updates(0, 30).await?;
//! for update in updates {
//!     if let Some(message) = update.message {
//!         if let Some(text) = message.text {
//!             client.send_text(message.chat.id, &text).await?;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use config::ApiConfig;
pub use error::TelegramError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
