//! Error types for the bot.

use thiserror::Error;

/// Errors that can occur while running the bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat transport error.
    #[error("telegram error: {0}")]
    Telegram(#[from] telegram_api::TelegramError),

    /// Quota store error.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}
