//! The extraction pipeline: fetch, classify, deduplicate.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{error, info};

use crate::fetcher::PageFetcher;
use crate::filter::{self, FilterRule, Verdict};
use crate::types::CandidateImage;

/// Object-safe view of an extractor for callers that only need
/// [`ImageSource::extract`].
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Extract content image URLs from a post page.
    async fn extract(&self, post_url: &str) -> Vec<CandidateImage>;
}

/// Extracts content images from a rendered post page.
pub struct ImageExtractor<F: PageFetcher> {
    fetcher: F,
    rules: Vec<FilterRule>,
}

impl<F: PageFetcher> ImageExtractor<F> {
    /// Create an extractor with the default rule chain.
    pub fn new(fetcher: F) -> Self {
        Self::with_rules(fetcher, filter::default_rules())
    }

    /// Create an extractor with a custom rule chain.
    pub fn with_rules(fetcher: F, rules: Vec<FilterRule>) -> Self {
        Self { fetcher, rules }
    }

    /// Extract content image URLs from a post page.
    ///
    /// Never fails: a browser-level error is logged and degrades to an
    /// empty list, so a broken page reads as "nothing found" downstream.
    pub async fn extract(&self, post_url: &str) -> Vec<CandidateImage> {
        let nodes = match self.fetcher.fetch(post_url).await {
            Ok(nodes) => nodes,
            Err(e) => {
                error!("Extraction failed for {}: {}", post_url, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for node in nodes {
            if filter::evaluate(&self.rules, &node) == Verdict::Drop {
                continue;
            }
            // Kept nodes always carry a source; the first rule drops the rest.
            let Some(url) = node.src else { continue };

            if seen.insert(url.clone()) {
                candidates.push(CandidateImage {
                    url,
                    alt: node.alt,
                    width: node.width,
                    height: node.height,
                });
            }
        }

        info!(
            "Extracted {} unique images from {}",
            candidates.len(),
            post_url
        );
        candidates
    }
}

#[async_trait]
impl<F: PageFetcher> ImageSource for ImageExtractor<F> {
    async fn extract(&self, post_url: &str) -> Vec<CandidateImage> {
        ImageExtractor::extract(self, post_url).await
    }
}
