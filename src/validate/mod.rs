//! Client-side input validation
//!
//! Rules applied before write operations reach the network, so a bad comment
//! fails fast without wasting a round-trip. Also hosts the media-id sanitizer
//! used by every media-scoped endpoint.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Maximum comment length in code points
const MAX_COMMENT_LENGTH: usize = 300;

/// Maximum number of hashtag tokens per comment
const MAX_HASHTAGS: usize = 4;

/// Maximum number of URL tokens per comment
const MAX_URLS: usize = 1;

static COMPOSITE_MEDIA_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+_[0-9]+").expect("valid media id regex"));

static HASHTAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[^#\s]+").expect("valid hashtag regex"));

static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bhttps?://\S+\.\S+").expect("valid url regex"));

/// Comment rules enforced before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRule {
    /// Total length must not exceed 300 code points
    Length,
    /// A comment containing letters must not be entirely uppercase
    AllCaps,
    /// At most 4 hashtag tokens
    Hashtags,
    /// At most 1 URL token
    Urls,
}

impl fmt::Display for CommentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommentRule::Length => "length",
            CommentRule::AllCaps => "all_caps",
            CommentRule::Hashtags => "hashtags",
            CommentRule::Urls => "urls",
        };
        f.write_str(name)
    }
}

/// Validate comment text against all submission rules.
///
/// Returns the first violated rule as [`Error::Validation`]; passing text
/// yields `Ok(())`.
pub fn validate_comment(text: &str) -> Result<()> {
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(Error::validation(CommentRule::Length));
    }

    if text.chars().any(char::is_alphabetic) && text == text.to_uppercase() {
        return Err(Error::validation(CommentRule::AllCaps));
    }

    if HASHTAG_TOKEN.find_iter(text).count() > MAX_HASHTAGS {
        return Err(Error::validation(CommentRule::Hashtags));
    }

    if URL_TOKEN.find_iter(text).count() > MAX_URLS {
        return Err(Error::validation(CommentRule::Urls));
    }

    Ok(())
}

/// Reduce a composite `<numeric>_<numeric>` media id to its leading numeric
/// part; any other id passes through unchanged.
///
/// The web endpoints only accept the bare numeric id, not the composite form.
pub fn sanitize_media_id(id: &str) -> &str {
    if COMPOSITE_MEDIA_ID.is_match(id) {
        id.split('_').next().unwrap_or(id)
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(result: Result<()>) -> CommentRule {
        match result {
            Err(Error::Validation { rule }) => rule,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_sanitize_composite_id() {
        assert_eq!(sanitize_media_id("123456_789"), "123456");
    }

    #[test]
    fn test_sanitize_plain_id_unchanged() {
        assert_eq!(sanitize_media_id("123456"), "123456");
        assert_eq!(sanitize_media_id("BShortCode_x"), "BShortCode_x");
    }

    #[test]
    fn test_comment_too_long() {
        let text = "a".repeat(301);
        assert_eq!(rule_of(validate_comment(&text)), CommentRule::Length);
    }

    #[test]
    fn test_comment_exactly_max_length_ok() {
        let text = "a".repeat(300);
        assert!(validate_comment(&text).is_ok());
    }

    #[test]
    fn test_comment_all_caps() {
        assert_eq!(rule_of(validate_comment("HELLO WORLD")), CommentRule::AllCaps);
    }

    #[test]
    fn test_comment_without_letters_not_caps_checked() {
        assert!(validate_comment("1234 !!!").is_ok());
    }

    #[test]
    fn test_comment_too_many_hashtags() {
        assert_eq!(
            rule_of(validate_comment("#a #b #c #d #e")),
            CommentRule::Hashtags
        );
    }

    #[test]
    fn test_comment_too_many_urls() {
        assert_eq!(
            rule_of(validate_comment("see http://x.co and https://y.co")),
            CommentRule::Urls
        );
    }

    #[test]
    fn test_comment_passes_all_rules() {
        assert!(validate_comment("hi #fun http://x.co").is_ok());
    }

    #[test]
    fn test_length_checked_before_caps() {
        let text = "A".repeat(301);
        assert_eq!(rule_of(validate_comment(&text)), CommentRule::Length);
    }
}
