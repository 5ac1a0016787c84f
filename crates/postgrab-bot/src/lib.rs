//! Telegram bot that extracts and forwards images from LinkedIn posts.
//!
//! Wires the chat transport (`telegram-api`), the quota store
//! (`database`) and the browser extraction pipeline (`extractor`) into a
//! sequential update-dispatch loop:
//!
//! inbound URL → quota check → image extraction → capped delivery →
//! usage record.

pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod router;
pub mod sender;
pub mod texts;

pub use config::BotConfig;
pub use dispatch::Dispatcher;
pub use error::BotError;
pub use router::Router;
