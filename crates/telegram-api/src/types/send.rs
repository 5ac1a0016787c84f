//! Types for sending requests to the Bot API.

use serde::{Deserialize, Serialize};

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendMessageParams {
    /// Target chat identifier.
    pub chat_id: i64,

    /// The message text.
    pub text: String,

    /// Formatting mode ("Markdown", "HTML").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,

    /// Inline keyboard attached below the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessageParams {
    /// Create params for a plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Render the text as Markdown.
    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some("Markdown".to_string());
        self
    }

    /// Attach an inline keyboard.
    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// Parameters for `sendPhoto`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendPhotoParams {
    /// Target chat identifier.
    pub chat_id: i64,

    /// Photo to send, as an HTTP URL the API fetches server-side.
    pub photo: String,

    /// Caption shown under the photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl SendPhotoParams {
    /// Create params for a photo referenced by URL.
    pub fn url(chat_id: i64, photo: impl Into<String>) -> Self {
        Self {
            chat_id,
            photo: photo.into(),
            ..Default::default()
        }
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Parameters for `editMessageText`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditMessageTextParams {
    /// Chat the message lives in.
    pub chat_id: i64,

    /// Identifier of the message to edit.
    pub message_id: i64,

    /// Replacement text.
    pub text: String,

    /// Formatting mode ("Markdown", "HTML").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,

    /// Replacement inline keyboard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl EditMessageTextParams {
    /// Create params replacing a message's text.
    pub fn new(chat_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Render the text as Markdown.
    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some("Markdown".to_string());
        self
    }

    /// Attach a replacement inline keyboard.
    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// Parameters for `answerCallbackQuery`.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQueryParams {
    /// Identifier of the query being answered.
    pub callback_query_id: String,
}

/// An inline keyboard attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    /// Button rows, top to bottom.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Build a keyboard with one button per row.
    pub fn column(buttons: Vec<InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// A single inline keyboard button.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    /// Button label.
    pub text: String,

    /// Data sent back in the callback query when pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    /// Create a button that fires a callback query.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
        }
    }
}
