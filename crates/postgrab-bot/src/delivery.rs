//! Best-effort delivery of candidate images to a chat.

use std::time::Duration;

use extractor::CandidateImage;
use tracing::{debug, warn};

use crate::sender::MediaSender;
use crate::texts;

/// Anti-spam cap on images delivered per request.
pub const MAX_IMAGES_PER_REQUEST: usize = 10;

/// Configuration for the delivery loop.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Maximum number of images delivered per request; extras are
    /// silently dropped.
    pub max_images: usize,

    /// Pause after every send attempt.
    pub send_delay: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES_PER_REQUEST,
            send_delay: Duration::from_secs(1),
        }
    }
}

/// Counters for one delivery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Images delivered as media messages.
    pub sent: u32,
    /// Images whose media send failed.
    pub failed: u32,
}

/// Sends candidate images one by one, tolerating per-item failures.
pub struct DeliveryPipeline<S: MediaSender> {
    sender: S,
    config: DeliveryConfig,
}

impl<S: MediaSender> DeliveryPipeline<S> {
    /// Create a pipeline over the given sender.
    pub fn new(sender: S, config: DeliveryConfig) -> Self {
        Self { sender, config }
    }

    /// How many of `available` candidates one run will process.
    pub fn batch_size(&self, available: usize) -> usize {
        available.min(self.config.max_images)
    }

    /// Send up to the configured cap of images to the chat.
    ///
    /// Each item is attempted as a captioned photo; a failed photo send
    /// falls back to the raw URL as plain text. The loop never aborts on
    /// a single item, and a fixed pause follows every attempt to stay
    /// under the channel's rate limits. Partial success is a normal
    /// outcome, reported through the counters.
    pub async fn deliver(&self, chat_id: i64, images: &[CandidateImage]) -> DeliveryReport {
        let batch = &images[..self.batch_size(images.len())];
        let total = batch.len();
        let mut report = DeliveryReport::default();

        for (position, image) in batch.iter().enumerate() {
            let caption = texts::photo_caption(position + 1, total);

            match self.sender.send_photo(chat_id, &image.url, &caption).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!("Failed to send image {}/{}: {}", position + 1, total, e);
                    report.failed += 1;

                    let fallback = texts::photo_fallback(position + 1, &image.url);
                    if let Err(e) = self.sender.send_text(chat_id, &fallback).await {
                        debug!("URL fallback for image {} also failed: {}", position + 1, e);
                    }
                }
            }

            tokio::time::sleep(self.config.send_delay).await;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    use crate::error::BotError;

    /// Sender that records sends and fails photo URLs containing "fail".
    #[derive(Clone, Default)]
    struct RecordingSender {
        photos: Arc<Mutex<Vec<String>>>,
        texts: Arc<Mutex<Vec<String>>>,
        fail_fallback_too: bool,
    }

    #[async_trait]
    impl MediaSender for RecordingSender {
        async fn send_text(&self, _chat_id: i64, text: &str) -> Result<i64, BotError> {
            if self.fail_fallback_too {
                return Err(BotError::SendFailed("text rejected".to_string()));
            }
            self.texts.lock().unwrap().push(text.to_string());
            Ok(1)
        }

        async fn send_photo(&self, _chat_id: i64, url: &str, _caption: &str) -> Result<(), BotError> {
            if url.contains("fail") {
                return Err(BotError::SendFailed("photo rejected".to_string()));
            }
            self.photos.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn edit_text(&self, _chat_id: i64, _message_id: i64, _text: &str) -> Result<(), BotError> {
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

    fn pipeline(sender: RecordingSender) -> DeliveryPipeline<RecordingSender> {
        let config = DeliveryConfig {
            send_delay: Duration::ZERO,
            ..Default::default()
        };
        DeliveryPipeline::new(sender, config)
    }

    #[tokio::test]
    async fn test_caps_at_ten_images() {
        let sender = RecordingSender::default();
        let images: Vec<CandidateImage> = (0..15)
            .map(|i| candidate(&format!("https://media.example.com/{}.jpg", i)))
            .collect();

        let report = pipeline(sender.clone()).deliver(1, &images).await;

        assert_eq!(report.sent, 10);
        assert_eq!(report.failed, 0);
        let photos = sender.photos.lock().unwrap();
        assert_eq!(photos.len(), 10);
        assert_eq!(photos[0], "https://media.example.com/0.jpg");
        assert_eq!(photos[9], "https://media.example.com/9.jpg");
    }

    #[tokio::test]
    async fn test_partial_failure_falls_back_to_url() {
        let sender = RecordingSender::default();
        let images = vec![
            candidate("https://media.example.com/a.jpg"),
            candidate("https://media.example.com/fail-b.jpg"),
            candidate("https://media.example.com/c.jpg"),
        ];

        let report = pipeline(sender.clone()).deliver(1, &images).await;

        // Only true media sends count as successes.
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);

        let texts = sender.texts.lock().unwrap();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("https://media.example.com/fail-b.jpg"));
        assert!(texts[0].contains("Image 2"));
    }

    #[tokio::test]
    async fn test_fallback_failure_is_silent() {
        let sender = RecordingSender {
            fail_fallback_too: true,
            ..Default::default()
        };
        let images = vec![
            candidate("https://media.example.com/fail-a.jpg"),
            candidate("https://media.example.com/b.jpg"),
        ];

        let report = pipeline(sender.clone()).deliver(1, &images).await;

        // The loop continues past a failed fallback.
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_captions_are_positional() {
        let captions = Arc::new(Mutex::new(Vec::new()));

        #[derive(Clone)]
        struct CaptionSender {
            captions: Arc<Mutex<Vec<String>>>,
        }

        #[async_trait]
        impl MediaSender for CaptionSender {
            async fn send_text(&self, _c: i64, _t: &str) -> Result<i64, BotError> {
                Ok(1)
            }
            async fn send_photo(&self, _c: i64, _u: &str, caption: &str) -> Result<(), BotError> {
                self.captions.lock().unwrap().push(caption.to_string());
                Ok(())
            }
            async fn edit_text(&self, _c: i64, _m: i64, _t: &str) -> Result<(), BotError> {
                Ok(())
            }
        }

        let images = vec![
            candidate("https://media.example.com/a.jpg"),
            candidate("https://media.example.com/b.jpg"),
        ];
        let config = DeliveryConfig {
            send_delay: Duration::ZERO,
            ..Default::default()
        };
        let pipeline = DeliveryPipeline::new(
            CaptionSender {
                captions: captions.clone(),
            },
            config,
        );
        pipeline.deliver(1, &images).await;

        let captions = captions.lock().unwrap();
        assert_eq!(*captions, ["🖼️ Image 1/2", "🖼️ Image 2/2"]);
    }
}
