//! Telegram Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::TelegramError;
use crate::types::{
    AnswerCallbackQueryParams, EditMessageTextParams, Message, SendMessageParams, SendPhotoParams,
    Update, User,
};

/// Default HTTP timeout for ordinary method calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra headroom on top of the long-poll timeout for `getUpdates`.
const POLL_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Response envelope used by every Bot API method.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i32>,
}

/// Parameters for `getUpdates`.
#[derive(Debug, Serialize)]
struct GetUpdatesParams {
    offset: i64,
    timeout: u64,
}

/// Client for communicating with the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: ApiConfig,
}

impl TelegramClient {
    /// Create a client without verifying the token.
    pub fn new(config: ApiConfig) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a client and verify the token with a `getMe` call.
    pub async fn connect(config: ApiConfig) -> Result<Self, TelegramError> {
        let client = Self::new(config)?;

        let me = client.get_me().await?;
        info!(
            "Connected to Telegram Bot API as @{}",
            me.username.as_deref().unwrap_or("unknown")
        );

        Ok(client)
    }

    /// Get the bot's own account.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &()).await
    }

    /// Long-poll for updates with ids >= `offset`.
    ///
    /// Blocks for up to `timeout_secs` on the server side when no updates
    /// are pending.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout_secs,
        };

        // The request must outlive the server-side poll timeout.
        let request_timeout = Duration::from_secs(timeout_secs) + POLL_TIMEOUT_MARGIN;

        let response = self
            .http
            .post(self.config.method_url("getUpdates"))
            .timeout(request_timeout)
            .json(&params)
            .send()
            .await
            .map_err(TelegramError::Http)?;

        Self::decode(response).await
    }

    /// Send a message using the full parameter structure.
    pub async fn send_message(&self, params: SendMessageParams) -> Result<Message, TelegramError> {
        self.call("sendMessage", &params).await
    }

    /// Send a plain text message to a chat.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.send_message(SendMessageParams::text(chat_id, text)).await
    }

    /// Send a photo by URL with a caption.
    pub async fn send_photo(&self, params: SendPhotoParams) -> Result<Message, TelegramError> {
        self.call("sendPhoto", &params).await
    }

    /// Replace the text (and keyboard) of a previously sent message.
    pub async fn edit_message_text(
        &self,
        params: EditMessageTextParams,
    ) -> Result<(), TelegramError> {
        // The result is the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self.call("editMessageText", &params).await?;
        Ok(())
    }

    /// Acknowledge a callback query so the client stops its spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let params = AnswerCallbackQueryParams {
            callback_query_id: callback_query_id.to_string(),
        };
        let _: serde_json::Value = self.call("answerCallbackQuery", &params).await?;
        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Make a Bot API method call.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, TelegramError> {
        debug!("API call: {}", method);

        let response = self
            .http
            .post(self.config.method_url(method))
            .json(params)
            .send()
            .await
            .map_err(TelegramError::Http)?;

        Self::decode(response).await
    }

    /// Decode the Bot API response envelope.
    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, TelegramError> {
        let status = response.status();
        let body = response.text().await.map_err(TelegramError::Http)?;

        let api_response: ApiResponse<R> = serde_json::from_str(&body).map_err(|_| {
            TelegramError::Connection(format!("HTTP {}: {}", status, body))
        })?;

        if !api_response.ok {
            return Err(TelegramError::Api {
                code: api_response.error_code.unwrap_or(-1),
                description: api_response
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        api_response.result.ok_or(TelegramError::EmptyResult)
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}
