//! Heuristic classification of image elements.
//!
//! The target markup carries no stable structure to key off, so
//! classification is an ordered list of best-effort rules. False
//! positives and negatives are expected and tolerated downstream.

use tracing::debug;
use url::Url;

use crate::types::ImageNode;

/// URL substrings that mark an element as UI chrome rather than post
/// content. Matched case-insensitively against the full URL.
const CHROME_MARKERS: [&str; 8] = [
    "linkedin.com/in/",
    "/company-logo/",
    "/vector/",
    "sprite",
    "logo",
    "icon",
    "emoji",
    "reaction",
];

/// Minimum rendered dimension for a content image, in pixels.
pub const MIN_DIMENSION: u32 = 50;

/// Outcome of a rule that claimed an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Accept the element, skipping later rules.
    Keep,
    /// Exclude the element.
    Drop,
}

/// One classification rule: a predicate that may claim an element.
///
/// Rules are evaluated in order and the first one to return a verdict
/// wins, so rules can be added or reordered without touching the
/// traversal.
pub struct FilterRule {
    /// Short name used in skip diagnostics.
    pub name: &'static str,
    /// Returns a verdict when the rule applies to this element.
    pub check: fn(&ImageNode) -> Option<Verdict>,
}

/// The default rule chain, in evaluation order.
pub fn default_rules() -> Vec<FilterRule> {
    vec![
        FilterRule {
            name: "missing-or-inline-source",
            check: missing_or_inline_source,
        },
        FilterRule {
            name: "chrome-marker",
            check: chrome_marker,
        },
        FilterRule {
            name: "not-absolute-url",
            check: not_absolute_url,
        },
        FilterRule {
            name: "undersized",
            check: undersized,
        },
    ]
}

/// Apply the rule chain to an element. Elements no rule claims are kept.
pub fn evaluate(rules: &[FilterRule], node: &ImageNode) -> Verdict {
    for rule in rules {
        if let Some(verdict) = (rule.check)(node) {
            if verdict == Verdict::Drop {
                debug!(
                    "Dropping image ({}): {}",
                    rule.name,
                    node.src.as_deref().unwrap_or("<no src>")
                );
            }
            return verdict;
        }
    }
    Verdict::Keep
}

/// Elements without a source, or with an inline-encoded one, carry no
/// fetchable image.
fn missing_or_inline_source(node: &ImageNode) -> Option<Verdict> {
    match &node.src {
        None => Some(Verdict::Drop),
        Some(src) if src.starts_with("data:") => Some(Verdict::Drop),
        Some(_) => None,
    }
}

/// Profile photos, company logos, vector icons, sprites, emoji and
/// reaction images are chrome regardless of size.
fn chrome_marker(node: &ImageNode) -> Option<Verdict> {
    let src = node.src.as_deref()?.to_lowercase();
    if CHROME_MARKERS.iter().any(|marker| src.contains(marker)) {
        Some(Verdict::Drop)
    } else {
        None
    }
}

/// Only absolute network URLs can be forwarded to the messaging channel.
fn not_absolute_url(node: &ImageNode) -> Option<Verdict> {
    let src = node.src.as_deref()?;
    match Url::parse(src) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        _ => Some(Verdict::Drop),
    }
}

/// Icon-sized elements are chrome, but only when both dimensions are
/// actually known.
fn undersized(node: &ImageNode) -> Option<Verdict> {
    match (node.width, node.height) {
        (Some(w), Some(h)) if w < MIN_DIMENSION || h < MIN_DIMENSION => Some(Verdict::Drop),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(src: &str) -> ImageNode {
        ImageNode {
            src: Some(src.to_string()),
            ..Default::default()
        }
    }

    fn sized(src: &str, width: u32, height: u32) -> ImageNode {
        ImageNode {
            src: Some(src.to_string()),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    fn verdict(node: &ImageNode) -> Verdict {
        evaluate(&default_rules(), node)
    }

    #[test]
    fn test_missing_source_is_dropped() {
        assert_eq!(verdict(&ImageNode::default()), Verdict::Drop);
    }

    #[test]
    fn test_inline_source_is_dropped() {
        assert_eq!(verdict(&node("data:image/png;base64,iVBOR")), Verdict::Drop);
    }

    #[test]
    fn test_chrome_markers_drop_regardless_of_size() {
        // Large dimensions must not rescue a denylisted URL.
        assert_eq!(
            verdict(&sized("https://cdn.example.com/brand-logo.png", 2000, 2000)),
            Verdict::Drop
        );
        assert_eq!(
            verdict(&node("https://media.example.com/sprite-sheet.png")),
            Verdict::Drop
        );
        assert_eq!(
            verdict(&node("https://www.linkedin.com/in/someone/photo.jpg")),
            Verdict::Drop
        );
        assert_eq!(
            verdict(&node("https://cdn.example.com/emoji/smile.png")),
            Verdict::Drop
        );
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        assert_eq!(
            verdict(&node("https://cdn.example.com/Company-LOGO.png")),
            Verdict::Drop
        );
    }

    #[test]
    fn test_relative_url_is_dropped() {
        assert_eq!(verdict(&node("/media/photo.jpg")), Verdict::Drop);
    }

    #[test]
    fn test_non_network_scheme_is_dropped() {
        assert_eq!(verdict(&node("file:///tmp/photo.jpg")), Verdict::Drop);
    }

    #[test]
    fn test_undersized_is_dropped() {
        assert_eq!(
            verdict(&sized("https://media.example.com/photo.jpg", 49, 800)),
            Verdict::Drop
        );
        assert_eq!(
            verdict(&sized("https://media.example.com/photo.jpg", 800, 49)),
            Verdict::Drop
        );
    }

    #[test]
    fn test_threshold_boundary_is_kept() {
        assert_eq!(
            verdict(&sized("https://media.example.com/photo.jpg", 50, 50)),
            Verdict::Keep
        );
    }

    #[test]
    fn test_unknown_dimensions_are_not_dropped_on_size() {
        assert_eq!(
            verdict(&node("https://media.example.com/photo.jpg")),
            Verdict::Keep
        );
        let half_known = ImageNode {
            src: Some("https://media.example.com/photo.jpg".to_string()),
            width: Some(10),
            height: None,
            ..Default::default()
        };
        assert_eq!(verdict(&half_known), Verdict::Keep);
    }

    #[test]
    fn test_content_image_is_kept() {
        assert_eq!(
            verdict(&sized(
                "https://media.licdn.com/dms/image/v2/D4D22AQ/feedshare/photo.jpg",
                1024,
                768
            )),
            Verdict::Keep
        );
    }
}
