//! Error types for the extractor.

use thiserror::Error;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// HTTP request to chromedriver failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the WebDriver endpoint.
    #[error("WebDriver error {error}: {message}")]
    WebDriver { error: String, message: String },

    /// The driver returned a payload with an unexpected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}
