//! SQLite persistence layer for postgrab.
//!
//! This crate provides async database operations for users and usage
//! events using SQLx with SQLite. Usage events back the per-user daily
//! download quota.
//!
//! # Example
//!
//! ```no_run
//! use database::{usage, user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:postgrab.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Register a user on first contact
//!     let profile = user::Profile {
//!         username: Some("ada".to_string()),
//!         ..Default::default()
//!     };
//!     let u = user::get_or_create(db.pool(), "12345", &profile).await?;
//!
//!     // Reserve one quota slot for today
//!     let window = usage::DayWindow::today();
//!     let event = usage::reserve(db.pool(), u.id, "https://example.com/post", &window, 5).await?;
//!     println!("reserved: {:?}", event);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod usage;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{UsageEvent, User};
pub use usage::DayWindow;
pub use user::Profile;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    ///
    /// The bot handles one update at a time, so a small pool is enough.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/postgrab.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: i64 = 5;

    async fn test_db() -> Database {
        // One connection: pooled in-memory databases are not shared.
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn profile(username: &str) -> Profile {
        Profile {
            username: Some(username.to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let db = test_db().await;

        let first = user::get_or_create(db.pool(), "42", &profile("ada")).await.unwrap();
        let second = user::get_or_create(db.pool(), "42", &profile("ada")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.telegram_id, "42");
        assert_eq!(second.username.as_deref(), Some("ada"));
        assert!(!second.is_premium);
        assert!(second.last_active >= first.last_active);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_get_or_create_keeps_fields_on_sparse_contact() {
        let db = test_db().await;

        user::get_or_create(db.pool(), "42", &profile("ada")).await.unwrap();
        // A later contact without display fields must not wipe them.
        let refreshed = user::get_or_create(db.pool(), "42", &Profile::default())
            .await
            .unwrap();

        assert_eq!(refreshed.username.as_deref(), Some("ada"));
        assert_eq!(refreshed.first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_reserve_counts_against_the_daily_limit() {
        let db = test_db().await;
        let u = user::get_or_create(db.pool(), "42", &profile("ada")).await.unwrap();
        let window = DayWindow::today();

        for i in 0..LIMIT {
            assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), i);
            let event = usage::reserve(db.pool(), u.id, "https://example.com/p", &window, LIMIT)
                .await
                .unwrap();
            assert!(event.is_some(), "reservation {} should be granted", i);
        }

        // The limit is exhausted; the conditional insert must refuse.
        let denied = usage::reserve(db.pool(), u.id, "https://example.com/p", &window, LIMIT)
            .await
            .unwrap();
        assert!(denied.is_none());
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), LIMIT);
    }

    #[tokio::test]
    async fn test_quota_is_per_user() {
        let db = test_db().await;
        let a = user::get_or_create(db.pool(), "1", &profile("a")).await.unwrap();
        let b = user::get_or_create(db.pool(), "2", &profile("b")).await.unwrap();
        let window = DayWindow::today();

        for _ in 0..LIMIT {
            usage::reserve(db.pool(), a.id, "u", &window, LIMIT).await.unwrap();
        }

        let granted = usage::reserve(db.pool(), b.id, "u", &window, LIMIT).await.unwrap();
        assert!(granted.is_some());
    }

    #[tokio::test]
    async fn test_finalize_records_the_delivered_count() {
        let db = test_db().await;
        let u = user::get_or_create(db.pool(), "42", &profile("ada")).await.unwrap();
        let window = DayWindow::today();

        let event_id = usage::reserve(db.pool(), u.id, "https://example.com/p", &window, LIMIT)
            .await
            .unwrap()
            .unwrap();
        usage::finalize(db.pool(), event_id, 2).await.unwrap();

        let event = usage::get(db.pool(), event_id).await.unwrap();
        assert_eq!(event.delivered_count, 2);
        assert_eq!(event.post_url, "https://example.com/p");
    }

    #[tokio::test]
    async fn test_release_refunds_the_reservation() {
        let db = test_db().await;
        let u = user::get_or_create(db.pool(), "42", &profile("ada")).await.unwrap();
        let window = DayWindow::today();

        let event_id = usage::reserve(db.pool(), u.id, "https://example.com/p", &window, LIMIT)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), 1);

        usage::release(db.pool(), event_id).await.unwrap();
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), 0);

        let missing = usage::get(db.pool(), event_id).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_finalize_missing_event_is_not_found() {
        let db = test_db().await;
        let result = usage::finalize(db.pool(), 999, 1).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
