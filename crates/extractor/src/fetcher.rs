//! Page fetching behind a trait seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::WebDriverConfig;
use crate::error::ExtractorError;
use crate::session::WebDriverSession;
use crate::types::ImageNode;

/// HTTP timeout for individual chromedriver calls.
const DRIVER_TIMEOUT: Duration = Duration::from_secs(30);

/// Script returning the size of the rendered DOM, used as a stability probe.
const NODE_COUNT_SCRIPT: &str = "return document.getElementsByTagName('*').length";

/// Script that scrolls to the bottom of the page.
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Fetches the rendered image elements of a post page.
///
/// Abstracted so the classification pipeline can be exercised without a
/// browser.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Render `post_url` and return its image elements, in DOM order.
    async fn fetch(&self, post_url: &str) -> Result<Vec<ImageNode>, ExtractorError>;
}

/// Fetcher that renders the page in headless Chrome via chromedriver.
pub struct WebDriverFetcher {
    http: Client,
    config: WebDriverConfig,
}

impl WebDriverFetcher {
    /// Create a fetcher for the configured chromedriver endpoint.
    pub fn new(config: WebDriverConfig) -> Result<Self, ExtractorError> {
        let http = Client::builder()
            .timeout(DRIVER_TIMEOUT)
            .build()
            .map_err(ExtractorError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &WebDriverConfig {
        &self.config
    }

    /// The rendering steps run against an open session.
    async fn fetch_in_session(
        &self,
        session: &WebDriverSession,
        post_url: &str,
    ) -> Result<Vec<ImageNode>, ExtractorError> {
        info!("Loading {}", post_url);
        session.navigate(post_url).await?;

        self.wait_for_stable_render(session).await;

        // Scroll to the bottom a few times to trigger lazy-loaded content.
        for round in 0..self.config.scroll_rounds {
            if let Err(e) = session.execute(SCROLL_SCRIPT).await {
                warn!("Scroll round {} failed: {}", round + 1, e);
                break;
            }
            tokio::time::sleep(self.config.scroll_pause).await;
        }

        let elements = session.find_elements("img").await?;
        debug!("Found {} image elements", elements.len());

        let mut nodes = Vec::with_capacity(elements.len());
        for element in &elements {
            match self.read_node(session, element).await {
                Ok(node) => nodes.push(node),
                // A stale or detached element loses only itself.
                Err(e) => warn!("Failed to read image element: {}", e),
            }
        }

        Ok(nodes)
    }

    /// Poll the DOM node count until two consecutive samples agree or the
    /// settle timeout elapses.
    async fn wait_for_stable_render(&self, session: &WebDriverSession) {
        let deadline = Instant::now() + self.config.settle_timeout;
        let mut last: Option<u64> = None;

        loop {
            tokio::time::sleep(self.config.settle_poll).await;

            let sample = match session.execute(NODE_COUNT_SCRIPT).await {
                Ok(value) => value.as_u64(),
                Err(e) => {
                    debug!("Stability probe failed: {}", e);
                    None
                }
            };

            if sample.is_some() && sample == last {
                debug!("Render stabilized at {} nodes", sample.unwrap_or(0));
                return;
            }
            last = sample;

            if Instant::now() >= deadline {
                debug!(
                    "Render did not stabilize within {:?}",
                    self.config.settle_timeout
                );
                return;
            }
        }
    }

    /// Read one element's source, alt text and declared dimensions.
    async fn read_node(
        &self,
        session: &WebDriverSession,
        element: &str,
    ) -> Result<ImageNode, ExtractorError> {
        let src = match session.element_property(element, "currentSrc").await? {
            Some(src) if !src.is_empty() => Some(src),
            _ => session.element_attribute(element, "src").await?,
        };
        let alt = session
            .element_attribute(element, "alt")
            .await?
            .filter(|alt| !alt.is_empty());
        let width = parse_dimension(session.element_attribute(element, "width").await?);
        let height = parse_dimension(session.element_attribute(element, "height").await?);

        Ok(ImageNode {
            src,
            alt,
            width,
            height,
        })
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, post_url: &str) -> Result<Vec<ImageNode>, ExtractorError> {
        let session = WebDriverSession::create(self.http.clone(), self.config.clone()).await?;

        let result = self.fetch_in_session(&session, post_url).await;

        // The browser process is released on success and failure alike.
        if let Err(e) = session.close().await {
            warn!("Failed to close WebDriver session {}: {}", session.id(), e);
        }

        result
    }
}

/// Parse a width/height attribute value. Absent or malformed is unknown.
fn parse_dimension(raw: Option<String>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse().ok())
}
