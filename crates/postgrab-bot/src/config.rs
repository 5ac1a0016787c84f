//! Bot configuration loaded from the environment.

use std::env;
use std::time::Duration;

use crate::error::BotError;

/// Number of extractions a user may run per local calendar day.
pub const DEFAULT_DAILY_LIMIT: i64 = 5;

/// Pause after each image send, to stay under the channel's rate limits.
const DEFAULT_SEND_DELAY: Duration = Duration::from_secs(1);

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token. Required.
    pub telegram_token: String,
    /// SQLite URL for the quota store.
    pub database_url: String,
    /// chromedriver endpoint used by the extractor.
    pub webdriver_url: String,
    /// Extractions allowed per user per local calendar day.
    pub daily_limit: i64,
    /// Pause after each image send.
    pub send_delay: Duration,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `TELEGRAM_TOKEN`
    ///
    /// Optional env vars:
    /// - `DATABASE_URL` (default: sqlite:data/postgrab.db?mode=rwc)
    /// - `WEBDRIVER_URL` (default: http://localhost:9515)
    /// - `DAILY_LIMIT` (default: 5)
    pub fn from_env() -> Result<Self, BotError> {
        let telegram_token = env::var("TELEGRAM_TOKEN").map_err(|_| {
            BotError::Config("TELEGRAM_TOKEN environment variable is required".to_string())
        })?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:data/postgrab.db?mode=rwc".to_string());
        let webdriver_url =
            env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:9515".to_string());
        let daily_limit = env::var("DAILY_LIMIT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_DAILY_LIMIT);

        Ok(Self {
            telegram_token,
            database_url,
            webdriver_url,
            daily_limit,
            send_delay: DEFAULT_SEND_DELAY,
        })
    }
}
