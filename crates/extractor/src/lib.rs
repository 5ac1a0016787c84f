//! Browser-driven image extraction for LinkedIn posts.
//!
//! This crate renders a post URL in headless Chrome (driven through a
//! chromedriver endpoint), enumerates the image elements in the rendered
//! DOM, classifies them against an ordered rule list that separates post
//! content from UI chrome, and returns a deduplicated ordered list of
//! candidate image URLs.
//!
//! The browser side is abstracted behind the [`PageFetcher`] trait so the
//! classification pipeline can be exercised without a browser.
//!
//! # Example
//!
//! ```no_run
//! use extractor::{ImageExtractor, WebDriverConfig, WebDriverFetcher};
//!
//! # async fn example() -> Result<(), extractor::ExtractorError> {
//! let fetcher = WebDriverFetcher::new(WebDriverConfig::default())?;
//! let extractor = ImageExtractor::new(fetcher);
//!
//! // Never fails: a broken page degrades to an empty list.
//! let images = extractor.extract("https://www.linkedin.com/posts/example").await;
//! for image in images {
//!     println!("{}", image.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod filter;
pub mod session;
pub mod types;

pub use config::WebDriverConfig;
pub use error::ExtractorError;
pub use extract::{ImageExtractor, ImageSource};
pub use fetcher::{PageFetcher, WebDriverFetcher};
pub use filter::{default_rules, FilterRule, Verdict};
pub use session::WebDriverSession;
pub use types::{CandidateImage, ImageNode};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
