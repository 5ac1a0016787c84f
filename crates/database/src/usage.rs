//! Usage-event operations backing the daily quota.

use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::UsageEvent;

/// UTC bounds of one local calendar day, in SQLite datetime format.
///
/// Rows are stamped with `datetime('now')` (UTC), so the local-midnight
/// bounds are converted to UTC strings and compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    /// Inclusive lower bound.
    pub start: String,
    /// Exclusive upper bound.
    pub end: String,
}

impl DayWindow {
    /// The window covering the current local calendar day.
    pub fn today() -> Self {
        let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
        Self {
            start: to_utc_bound(midnight),
            end: to_utc_bound(midnight + Duration::days(1)),
        }
    }
}

/// Resolve a local wall-clock instant to a UTC string comparable with
/// stored `datetime('now')` values.
fn to_utc_bound(local: NaiveDateTime) -> String {
    let utc: DateTime<Utc> = match Local.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // A DST gap can swallow local midnight; fall back to the current offset.
        LocalResult::None => Utc.from_utc_datetime(&(local - Local::now().offset().fix())),
    };
    utc.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Count the user's usage events inside the given day window.
pub async fn count_today(pool: &SqlitePool, user_id: i64, window: &DayWindow) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM usage_events
        WHERE user_id = ? AND created_at >= ? AND created_at < ?
        "#,
    )
    .bind(user_id)
    .bind(&window.start)
    .bind(&window.end)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Reserve one quota slot for the user, if any remains in the window.
///
/// The quota check and the append are a single conditional INSERT, so
/// concurrent requests from the same user cannot overshoot the limit.
/// Returns the new event's id, or `None` when the quota is exhausted.
pub async fn reserve(
    pool: &SqlitePool,
    user_id: i64,
    post_url: &str,
    window: &DayWindow,
    limit: i64,
) -> Result<Option<i64>> {
    let result = sqlx::query(
        r#"
        INSERT INTO usage_events (user_id, post_url, delivered_count, created_at)
        SELECT ?, ?, 0, datetime('now')
        WHERE (
            SELECT COUNT(*) FROM usage_events
            WHERE user_id = ? AND created_at >= ? AND created_at < ?
        ) < ?
        "#,
    )
    .bind(user_id)
    .bind(post_url)
    .bind(user_id)
    .bind(&window.start)
    .bind(&window.end)
    .bind(limit)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(result.last_insert_rowid()))
}

/// Record the delivered image count on a reserved event.
pub async fn finalize(pool: &SqlitePool, event_id: i64, delivered_count: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE usage_events
        SET delivered_count = ?
        WHERE id = ?
        "#,
    )
    .bind(delivered_count)
    .bind(event_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "UsageEvent",
            id: event_id.to_string(),
        });
    }

    Ok(())
}

/// Delete a reserved event whose extraction produced nothing, so an empty
/// scrape does not count against the user's quota.
pub async fn release(pool: &SqlitePool, event_id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM usage_events
        WHERE id = ?
        "#,
    )
    .bind(event_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "UsageEvent",
            id: event_id.to_string(),
        });
    }

    Ok(())
}

/// Get a usage event by id.
pub async fn get(pool: &SqlitePool, event_id: i64) -> Result<UsageEvent> {
    sqlx::query_as::<_, UsageEvent>(
        r#"
        SELECT id, user_id, post_url, delivered_count, created_at
        FROM usage_events
        WHERE id = ?
        "#,
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "UsageEvent",
        id: event_id.to_string(),
    })
}
