//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user in the system, identified by their Telegram account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Internal row id.
    pub id: i64,
    /// Telegram account id, stored as text.
    pub telegram_id: String,
    /// Telegram username, without the leading "@".
    pub username: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Premium flag. No upgrade path exists yet.
    pub is_premium: bool,
    /// First contact timestamp.
    pub created_at: String,
    /// Most recent contact timestamp.
    pub last_active: String,
}

/// One permitted extraction attempt, counted against the daily quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageEvent {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user row id.
    pub user_id: i64,
    /// The post URL that was scraped.
    pub post_url: String,
    /// Number of images actually delivered for this attempt.
    pub delivered_count: i64,
    /// Creation timestamp.
    pub created_at: String,
}
