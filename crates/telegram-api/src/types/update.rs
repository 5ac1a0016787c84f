//! Inbound update types received from the Bot API.

use serde::Deserialize;

/// A single update delivered by `getUpdates`.
///
/// Exactly one of the optional payload fields is set per update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,

    /// New incoming message.
    #[serde(default)]
    pub message: Option<Message>,

    /// Callback query from an inline keyboard button.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// An incoming or sent message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    /// Message identifier, unique within the chat.
    pub message_id: i64,

    /// Sender of the message. Absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,

    /// Chat the message belongs to.
    #[serde(default)]
    pub chat: Chat,

    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,

    /// Text content, for text messages.
    #[serde(default)]
    pub text: Option<String>,
}

/// A chat (private conversation, group, or channel).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: i64,

    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A Telegram user or bot account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,

    /// True if this account is a bot.
    #[serde(default)]
    pub is_bot: bool,

    /// Username without the leading "@".
    #[serde(default)]
    pub username: Option<String>,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A callback query generated by an inline keyboard button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Unique query identifier, required by `answerCallbackQuery`.
    pub id: String,

    /// User who pressed the button.
    pub from: User,

    /// Message the button was attached to. Absent if too old.
    #[serde(default)]
    pub message: Option<Message>,

    /// The `callback_data` of the pressed button.
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_update() {
        let json = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "from": {"id": 99, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "chat": {"id": 99, "type": "private"},
                "date": 1700000000,
                "text": "https://www.linkedin.com/posts/example"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 42);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.text.as_deref(), Some("https://www.linkedin.com/posts/example"));
        let from = message.from.unwrap();
        assert_eq!(from.id, 99);
        assert_eq!(from.first_name.as_deref(), Some("Ada"));
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_parse_callback_update() {
        let json = r#"{
            "update_id": 43,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 99, "is_bot": false, "first_name": "Ada"},
                "message": {"message_id": 7, "chat": {"id": 99, "type": "private"}, "date": 0},
                "data": "stats"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("stats"));
        assert_eq!(query.message.unwrap().message_id, 7);
    }

    #[test]
    fn test_parse_update_without_payload() {
        // Unknown update kinds still carry an update_id and must not fail.
        let update: Update = serde_json::from_str(r#"{"update_id": 44}"#).unwrap();
        assert_eq!(update.update_id, 44);
        assert!(update.message.is_none());
    }
}
