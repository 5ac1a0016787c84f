//! The quota-gated extraction flow for free-form messages.

use database::{usage, user, Database, DayWindow, Profile};
use extractor::ImageSource;
use telegram_api::types::User as TgUser;
use tracing::{error, info, warn};

use crate::delivery::{DeliveryConfig, DeliveryPipeline, DeliveryReport};
use crate::error::BotError;
use crate::sender::MediaSender;
use crate::texts;

/// Substring a message must contain to be treated as a post URL.
const LINKEDIN_MARKER: &str = "linkedin.com";

/// Runs extract → deliver → record for one inbound URL, to completion,
/// before the dispatcher hands over the next update.
pub struct UrlHandler<E: ImageSource, S: MediaSender + Clone> {
    db: Database,
    extractor: E,
    sender: S,
    pipeline: DeliveryPipeline<S>,
    daily_limit: i64,
}

impl<E: ImageSource, S: MediaSender + Clone> UrlHandler<E, S> {
    /// Create a handler over explicit dependencies.
    pub fn new(
        db: Database,
        extractor: E,
        sender: S,
        daily_limit: i64,
        delivery: DeliveryConfig,
    ) -> Self {
        Self {
            db,
            extractor,
            pipeline: DeliveryPipeline::new(sender.clone(), delivery),
            sender,
            daily_limit,
        }
    }

    /// Handle one free-form text message as an extraction request.
    pub async fn handle(&self, chat_id: i64, from: &TgUser, text: &str) -> Result<(), BotError> {
        let telegram_id = from.id.to_string();
        let user = match user::get_or_create(self.db.pool(), &telegram_id, &profile_of(from)).await
        {
            Ok(user) => user,
            // An unreachable store degrades to an error reply.
            Err(e) => {
                error!("Failed to load user {}: {}", telegram_id, e);
                self.sender.send_text(chat_id, texts::ACCOUNT_ERROR).await?;
                return Ok(());
            }
        };

        let window = DayWindow::today();
        let used = usage::count_today(self.db.pool(), user.id, &window).await?;
        if used >= self.daily_limit {
            info!("User {} is over the daily limit", user.telegram_id);
            self.sender.send_text(chat_id, texts::LIMIT_REACHED).await?;
            return Ok(());
        }

        let url = text.trim();
        if !url.contains(LINKEDIN_MARKER) {
            self.sender.send_text(chat_id, texts::INVALID_URL).await?;
            return Ok(());
        }

        // The conditional insert is the enforcement point; the read above
        // only picks the friendlier reply.
        let reserved =
            usage::reserve(self.db.pool(), user.id, url, &window, self.daily_limit).await?;
        let Some(event_id) = reserved else {
            self.sender.send_text(chat_id, texts::LIMIT_REACHED).await?;
            return Ok(());
        };

        let status = match self.sender.send_text(chat_id, texts::PROCESSING).await {
            Ok(message_id) => Some(message_id),
            Err(e) => {
                warn!("Failed to send processing status: {}", e);
                None
            }
        };

        let images = self.extractor.extract(url).await;

        if images.is_empty() {
            // An empty scrape does not count against the quota.
            if let Err(e) = usage::release(self.db.pool(), event_id).await {
                warn!("Failed to release unused reservation {}: {}", event_id, e);
            }
            self.reply(chat_id, status, texts::NO_IMAGES).await?;
            return Ok(());
        }

        let batch = self.pipeline.batch_size(images.len());
        self.reply(chat_id, status, &texts::found_images(batch)).await?;

        let report = self.pipeline.deliver(chat_id, &images).await;

        if let Err(e) = usage::finalize(self.db.pool(), event_id, i64::from(report.sent)).await {
            warn!("Failed to record delivered count on event {}: {}", event_id, e);
        }

        let remaining = (self.daily_limit - used - 1).max(0);
        self.summarize(chat_id, report, remaining).await
    }

    /// Edit the status message in place, or send fresh when there is none.
    async fn reply(&self, chat_id: i64, status: Option<i64>, text: &str) -> Result<(), BotError> {
        match status {
            Some(message_id) => self.sender.edit_text(chat_id, message_id, text).await,
            None => self.sender.send_text(chat_id, text).await.map(|_| ()),
        }
    }

    async fn summarize(
        &self,
        chat_id: i64,
        report: DeliveryReport,
        remaining: i64,
    ) -> Result<(), BotError> {
        let summary = if report.sent > 0 {
            texts::completion_summary(report.sent, report.failed, remaining)
        } else {
            texts::ALL_SENDS_FAILED.to_string()
        };
        self.sender.send_text(chat_id, &summary).await?;
        Ok(())
    }
}

/// Display fields carried over from the chat platform.
pub(crate) fn profile_of(from: &TgUser) -> Profile {
    Profile {
        username: from.username.clone(),
        first_name: from.first_name.clone(),
        last_name: from.last_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use extractor::CandidateImage;

    /// Extractor returning a fixed candidate list and counting calls.
    #[derive(Clone, Default)]
    struct StubExtractor {
        images: Vec<CandidateImage>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ImageSource for StubExtractor {
        async fn extract(&self, _post_url: &str) -> Vec<CandidateImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.images.clone()
        }
    }

    /// Sender that records everything and fails photo URLs containing "fail".
    #[derive(Clone, Default)]
    struct RecordingSender {
        texts: Arc<Mutex<Vec<String>>>,
        photos: Arc<Mutex<Vec<String>>>,
        edits: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl MediaSender for RecordingSender {
        async fn send_text(&self, _chat_id: i64, text: &str) -> Result<i64, BotError> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(10)
        }

        async fn send_photo(&self, _chat_id: i64, url: &str, _caption: &str) -> Result<(), BotError> {
            if url.contains("fail") {
                return Err(BotError::SendFailed("photo rejected".to_string()));
            }
            self.photos.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn edit_text(&self, _chat_id: i64, _message_id: i64, text: &str) -> Result<(), BotError> {
            self.edits.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn candidate(url: &str) -> CandidateImage {
        CandidateImage {
            url: url.to_string(),
            alt: None,
            width: None,
            height: None,
        }
    }

    fn tg_user(id: i64) -> TgUser {
        TgUser {
            id,
            is_bot: false,
            username: Some("ada".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
    }

    async fn test_db() -> Database {
        // One connection: pooled in-memory databases are not shared.
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn handler(
        db: Database,
        extractor: StubExtractor,
        sender: RecordingSender,
    ) -> UrlHandler<StubExtractor, RecordingSender> {
        let delivery = DeliveryConfig {
            send_delay: Duration::ZERO,
            ..Default::default()
        };
        UrlHandler::new(db, extractor, sender, 5, delivery)
    }

    #[tokio::test]
    async fn test_rejects_non_linkedin_text() {
        let db = test_db().await;
        let extractor = StubExtractor::default();
        let sender = RecordingSender::default();
        let h = handler(db.clone(), extractor.clone(), sender.clone());

        h.handle(1, &tg_user(42), "hello there").await.unwrap();

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        let texts_sent = sender.texts.lock().unwrap();
        assert_eq!(texts_sent.len(), 1);
        assert!(texts_sent[0].contains("valid LinkedIn post URL"));

        // No quota was consumed.
        let u = user::get_by_telegram_id(db.pool(), "42").await.unwrap();
        let window = DayWindow::today();
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_quota_gate_blocks_before_extraction() {
        let db = test_db().await;
        let extractor = StubExtractor {
            images: vec![candidate("https://media.example.com/a.jpg")],
            ..Default::default()
        };
        let sender = RecordingSender::default();
        let h = handler(db.clone(), extractor.clone(), sender.clone());

        // Exhaust the quota.
        let u = user::get_or_create(db.pool(), "42", &Profile::default()).await.unwrap();
        let window = DayWindow::today();
        for _ in 0..5 {
            usage::reserve(db.pool(), u.id, "u", &window, 5).await.unwrap().unwrap();
        }

        h.handle(1, &tg_user(42), "https://www.linkedin.com/posts/x")
            .await
            .unwrap();

        // Rejected before any browser automation.
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        let texts_sent = sender.texts.lock().unwrap();
        assert_eq!(texts_sent.len(), 1);
        assert!(texts_sent[0].contains("daily limit"));
    }

    #[tokio::test]
    async fn test_partial_delivery_is_recorded_once() {
        let db = test_db().await;
        let extractor = StubExtractor {
            images: vec![
                candidate("https://media.example.com/a.jpg"),
                candidate("https://media.example.com/fail-b.jpg"),
                candidate("https://media.example.com/c.jpg"),
            ],
            ..Default::default()
        };
        let sender = RecordingSender::default();
        let h = handler(db.clone(), extractor, sender.clone());

        h.handle(1, &tg_user(42), "https://www.linkedin.com/posts/x")
            .await
            .unwrap();

        // Two media sends succeeded, one fell back to a URL.
        assert_eq!(sender.photos.lock().unwrap().len(), 2);

        // Exactly one usage event, finalized with the media-send count.
        let u = user::get_by_telegram_id(db.pool(), "42").await.unwrap();
        let window = DayWindow::today();
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), 1);

        let texts_sent = sender.texts.lock().unwrap();
        let summary = texts_sent.last().unwrap();
        assert!(summary.contains("sent 2 images"));
        assert!(summary.contains("1 images failed"));
        assert!(summary.contains("4 downloads left"));

        let edits = sender.edits.lock().unwrap();
        assert!(edits.iter().any(|e| e.contains("Found 3 images")));
    }

    #[tokio::test]
    async fn test_empty_extraction_releases_the_reservation() {
        let db = test_db().await;
        let extractor = StubExtractor::default();
        let sender = RecordingSender::default();
        let h = handler(db.clone(), extractor, sender.clone());

        h.handle(1, &tg_user(42), "https://www.linkedin.com/posts/x")
            .await
            .unwrap();

        let u = user::get_by_telegram_id(db.pool(), "42").await.unwrap();
        let window = DayWindow::today();
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), 0);

        let edits = sender.edits.lock().unwrap();
        assert!(edits.iter().any(|e| e.contains("No images found")));
    }

    #[tokio::test]
    async fn test_delivered_count_is_finalized() {
        let db = test_db().await;
        let extractor = StubExtractor {
            images: vec![
                candidate("https://media.example.com/a.jpg"),
                candidate("https://media.example.com/b.jpg"),
            ],
            ..Default::default()
        };
        let sender = RecordingSender::default();
        let h = handler(db.clone(), extractor, sender.clone());

        h.handle(1, &tg_user(42), "https://www.linkedin.com/posts/x")
            .await
            .unwrap();

        let u = user::get_by_telegram_id(db.pool(), "42").await.unwrap();
        let window = DayWindow::today();
        assert_eq!(usage::count_today(db.pool(), u.id, &window).await.unwrap(), 1);

        // The reserved row (the only one, id 1) carries the delivered count.
        let event = usage::get(db.pool(), 1).await.unwrap();
        assert_eq!(event.user_id, u.id);
        assert_eq!(event.delivered_count, 2);
        assert_eq!(event.post_url, "https://www.linkedin.com/posts/x");
    }
}
