//! Routes inbound updates to command, menu and extraction handlers.

use database::{usage, user, Database, DayWindow};
use extractor::ImageSource;
use telegram_api::types::{CallbackQuery, Message, User as TgUser};
use telegram_api::{
    EditMessageTextParams, InlineKeyboardButton, InlineKeyboardMarkup, SendMessageParams,
    TelegramClient, Update,
};
use tracing::{debug, warn};

use crate::error::BotError;
use crate::handler::{profile_of, UrlHandler};
use crate::sender::TelegramSender;
use crate::texts;

/// Dispatch table for one update: commands, menu callbacks, free text.
pub struct Router<E: ImageSource> {
    client: TelegramClient,
    db: Database,
    handler: UrlHandler<E, TelegramSender>,
    daily_limit: i64,
}

impl<E: ImageSource> Router<E> {
    /// Create a router over explicit dependencies.
    pub fn new(
        client: TelegramClient,
        db: Database,
        handler: UrlHandler<E, TelegramSender>,
        daily_limit: i64,
    ) -> Self {
        Self {
            client,
            db,
            handler,
            daily_limit,
        }
    }

    /// Route one update to its handler.
    pub async fn route(&self, update: Update) -> Result<(), BotError> {
        if let Some(message) = update.message {
            self.on_message(&message).await
        } else if let Some(query) = update.callback_query {
            self.on_callback(&query).await
        } else {
            debug!("Ignoring update {} without message or callback", update.update_id);
            Ok(())
        }
    }

    async fn on_message(&self, message: &Message) -> Result<(), BotError> {
        let Some(text) = message.text.as_deref() else {
            debug!("Ignoring non-text message {}", message.message_id);
            return Ok(());
        };
        let Some(from) = message.from.as_ref() else {
            debug!("Ignoring message {} without sender", message.message_id);
            return Ok(());
        };

        match text.trim() {
            "/start" => self.on_start(message.chat.id, from).await,
            "/help" => {
                let params = SendMessageParams::text(message.chat.id, texts::HELP).markdown();
                self.client.send_message(params).await?;
                Ok(())
            }
            other if other.starts_with('/') => {
                debug!("Ignoring unknown command: {}", other);
                Ok(())
            }
            // Free-form text is treated as a post URL.
            other => self.handler.handle(message.chat.id, from, other).await,
        }
    }

    async fn on_start(&self, chat_id: i64, from: &TgUser) -> Result<(), BotError> {
        let telegram_id = from.id.to_string();
        if let Err(e) = user::get_or_create(self.db.pool(), &telegram_id, &profile_of(from)).await {
            warn!("Failed to register user {}: {}", telegram_id, e);
        }

        let params = SendMessageParams::text(chat_id, texts::WELCOME)
            .markdown()
            .with_keyboard(main_menu());
        self.client.send_message(params).await?;
        Ok(())
    }

    async fn on_callback(&self, query: &CallbackQuery) -> Result<(), BotError> {
        // Acknowledge first so the client stops its spinner.
        if let Err(e) = self.client.answer_callback_query(&query.id).await {
            warn!("Failed to answer callback query {}: {}", query.id, e);
        }

        let Some(message) = query.message.as_ref() else {
            debug!("Ignoring callback query {} without message", query.id);
            return Ok(());
        };

        match query.data.as_deref() {
            Some("stats") => self.show_stats(message, &query.from).await,
            Some("back_to_main") => self.edit_menu(message, texts::WELCOME, main_menu()).await,
            Some("help") => self.edit_menu(message, texts::HELP, back_menu()).await,
            other => {
                debug!("Ignoring unknown callback data: {:?}", other);
                Ok(())
            }
        }
    }

    /// Re-render the menu message as the user's stats card.
    async fn show_stats(&self, message: &Message, from: &TgUser) -> Result<(), BotError> {
        let telegram_id = from.id.to_string();
        let card = match user::get_or_create(self.db.pool(), &telegram_id, &profile_of(from)).await
        {
            Ok(u) => {
                let window = DayWindow::today();
                let used = usage::count_today(self.db.pool(), u.id, &window)
                    .await
                    .unwrap_or_else(|e| {
                        warn!("Failed to count usage for {}: {}", telegram_id, e);
                        0
                    });
                texts::stats_card(&u, used, self.daily_limit)
            }
            Err(e) => {
                warn!("Failed to load stats for {}: {}", telegram_id, e);
                texts::STATS_ERROR.to_string()
            }
        };

        self.edit_menu(message, &card, back_menu()).await
    }

    /// Replace a menu message's text and keyboard in place.
    async fn edit_menu(
        &self,
        message: &Message,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), BotError> {
        let params = EditMessageTextParams::new(message.chat.id, message.message_id, text)
            .markdown()
            .with_keyboard(keyboard);
        self.client.edit_message_text(params).await?;
        Ok(())
    }
}

/// The welcome menu keyboard.
fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::column(vec![
        InlineKeyboardButton::callback("📊 My Stats", "stats"),
        InlineKeyboardButton::callback("❓ Help", "help"),
    ])
}

/// The single Back button under submenus.
fn back_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::column(vec![InlineKeyboardButton::callback("⬅️ Back", "back_to_main")])
}
