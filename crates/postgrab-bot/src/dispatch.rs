//! The sequential update dispatch loop.

use std::time::Duration;

use extractor::ImageSource;
use telegram_api::TelegramClient;
use tracing::{error, info};

use crate::error::BotError;
use crate::router::Router;

/// Server-side long-poll timeout for getUpdates.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause before retrying after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Pulls updates and routes them one at a time.
///
/// Each update runs to completion before the next is handled; there are
/// no background tasks and no cancellation.
pub struct Dispatcher<E: ImageSource> {
    client: TelegramClient,
    router: Router<E>,
}

impl<E: ImageSource> Dispatcher<E> {
    /// Create a dispatcher over a connected client.
    pub fn new(client: TelegramClient, router: Router<E>) -> Self {
        Self { client, router }
    }

    /// Run the dispatch loop indefinitely.
    pub async fn run(self) -> Result<(), BotError> {
        info!("Starting update dispatcher");
        let mut offset = 0i64;

        loop {
            let updates = match self.client.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => updates,
                Err(e) => {
                    error!("Failed to fetch updates: {}", e);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let update_id = update.update_id;

                if let Err(e) = self.router.route(update).await {
                    // Log but continue dispatching.
                    error!("Error handling update {}: {}", update_id, e);
                }
            }
        }
    }
}
