//! Message sending behind a trait seam.

use async_trait::async_trait;
use telegram_api::{EditMessageTextParams, SendMessageParams, SendPhotoParams, TelegramClient};

use crate::error::BotError;

/// Trait for delivering messages to a chat.
///
/// Abstracted to support different transports (Telegram, tests.)
#[async_trait]
pub trait MediaSender: Send + Sync {
    /// Send a plain text message, returning its message id.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, BotError>;

    /// Send a photo by URL with a caption.
    async fn send_photo(&self, chat_id: i64, url: &str, caption: &str) -> Result<(), BotError>;

    /// Replace the text of a previously sent message.
    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError>;
}

/// Telegram-backed message sender.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    /// Create a sender over an existing client.
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaSender for TelegramSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        let message = self
            .client
            .send_message(SendMessageParams::text(chat_id, text))
            .await?;
        Ok(message.message_id)
    }

    async fn send_photo(&self, chat_id: i64, url: &str, caption: &str) -> Result<(), BotError> {
        self.client
            .send_photo(SendPhotoParams::url(chat_id, url).with_caption(caption))
            .await?;
        Ok(())
    }

    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError> {
        self.client
            .edit_message_text(EditMessageTextParams::new(chat_id, message_id, text))
            .await?;
        Ok(())
    }
}

/// A sender for debugging that logs all operations and discards them.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MediaSender for LoggingSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        tracing::info!("[text] to {}: {}", chat_id, text);
        Ok(0)
    }

    async fn send_photo(&self, chat_id: i64, url: &str, caption: &str) -> Result<(), BotError> {
        tracing::info!("[photo] to {}: {} ({})", chat_id, url, caption);
        Ok(())
    }

    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError> {
        tracing::info!("[edit] {} in {}: {}", message_id, chat_id, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_sender() {
        let sender = LoggingSender;

        // Should not error
        sender.send_text(1, "test").await.unwrap();
        sender.send_photo(1, "https://example.com/a.jpg", "Image 1/1").await.unwrap();
        sender.edit_text(1, 7, "edited").await.unwrap();
    }
}
