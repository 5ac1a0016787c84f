//! Value types produced by the extraction pipeline.

/// A raw image element as read from the rendered DOM.
///
/// Dimensions come from the element's attributes; an absent attribute is
/// `None` (unknown), never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageNode {
    /// Resolved source URL, if the element had one.
    pub src: Option<String>,
    /// Alt text, if present and non-empty.
    pub alt: Option<String>,
    /// Rendered width in pixels, if known.
    pub width: Option<u32>,
    /// Rendered height in pixels, if known.
    pub height: Option<u32>,
}

/// An image believed to be post content rather than UI chrome.
///
/// Transient: produced by the extractor, consumed by the delivery
/// pipeline, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateImage {
    /// Absolute source URL.
    pub url: String,
    /// Alt text, if present.
    pub alt: Option<String>,
    /// Rendered width in pixels, if known.
    pub width: Option<u32>,
    /// Rendered height in pixels, if known.
    pub height: Option<u32>,
}
