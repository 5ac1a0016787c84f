//! User upsert and lookup operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Display fields captured from the chat platform on each contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Telegram username, without the leading "@".
    pub username: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
}

/// Create the user on first contact, or refresh their profile and bump
/// `last_active` on a repeat contact.
///
/// Display fields the platform omitted are kept from the existing row.
pub async fn get_or_create(
    pool: &SqlitePool,
    telegram_id: &str,
    profile: &Profile,
) -> Result<User> {
    sqlx::query(
        r#"
        INSERT INTO users (telegram_id, username, first_name, last_name, is_premium, created_at, last_active)
        VALUES (?, ?, ?, ?, 0, datetime('now'), datetime('now'))
        ON CONFLICT(telegram_id) DO UPDATE SET
            username = COALESCE(excluded.username, users.username),
            first_name = COALESCE(excluded.first_name, users.first_name),
            last_name = COALESCE(excluded.last_name, users.last_name),
            last_active = excluded.last_active
        "#,
    )
    .bind(telegram_id)
    .bind(&profile.username)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .execute(pool)
    .await?;

    get_by_telegram_id(pool, telegram_id).await
}

/// Get a user by their Telegram account id.
pub async fn get_by_telegram_id(pool: &SqlitePool, telegram_id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, telegram_id, username, first_name, last_name, is_premium, created_at, last_active
        FROM users
        WHERE telegram_id = ?
        "#,
    )
    .bind(telegram_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: telegram_id.to_string(),
    })
}

/// Count total users.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
