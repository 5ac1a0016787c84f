//! Configuration types for the WebDriver-backed extractor.

use std::time::Duration;

/// Configuration for driving headless Chrome through chromedriver.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Base URL of the chromedriver HTTP server (e.g., "http://localhost:9515").
    pub base_url: String,

    /// Browser window size in pixels.
    pub window_size: (u32, u32),

    /// User agent presented to the target site.
    pub user_agent: String,

    /// Upper bound on waiting for the rendered DOM to stop growing.
    pub settle_timeout: Duration,

    /// Interval between DOM stability samples.
    pub settle_poll: Duration,

    /// Number of scroll-to-bottom rounds used to trigger lazy loading.
    pub scroll_rounds: u32,

    /// Pause after each scroll round.
    pub scroll_pause: Duration,
}

impl WebDriverConfig {
    /// Create a configuration with the given chromedriver URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// URL for creating a new session.
    pub fn new_session_url(&self) -> String {
        format!("{}/session", self.base_url)
    }

    /// URL for an endpoint under an existing session.
    pub fn session_url(&self, session_id: &str, tail: &str) -> String {
        if tail.is_empty() {
            format!("{}/session/{}", self.base_url, session_id)
        } else {
            format!("{}/session/{}/{}", self.base_url, session_id, tail)
        }
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9515".to_string(),
            window_size: (1920, 1080),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            settle_timeout: Duration::from_secs(8),
            settle_poll: Duration::from_millis(500),
            scroll_rounds: 3,
            scroll_pause: Duration::from_secs(2),
        }
    }
}
