//! Identifier derivation for externally controlled URLs.
//!
//! Video pages are addressed by the short alphanumeric token the
//! hosting provider embeds in its URLs, so links never re-expose the
//! full external URL. Derivation is pure string matching: no I/O, and
//! an unrecognized shape is an expected outcome, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const EMBED_BASE: &str = "https://rumble.com/embed/";

/// Embed form: .../embed/<token>, e.g. https://rumble.com/embed/v6oa7gc/?pub=4kxtac
static EMBED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/embed/([a-zA-Z0-9]+)").unwrap());

/// Canonical form: rumble.com/<token>-descriptive-text.html
static CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)rumble\.com/([a-zA-Z0-9]+)").unwrap());

/// Extracts the provider-assigned token from a video URL.
///
/// The embed form is checked before the canonical form; if a URL
/// somehow matches both, the embed token wins. The token stops at the
/// first non-alphanumeric character, so trailing descriptive text and
/// query strings never leak into it. Matching is case-insensitive but
/// the token's own casing is preserved.
pub fn video_slug(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    if let Some(captures) = EMBED_RE.captures(url) {
        return Some(captures[1].to_string());
    }
    CANONICAL_RE
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Canonical embeddable-player URL for a video URL, with any
/// publisher/tracking query parameters from the original dropped.
pub fn embed_url(url: &str) -> Option<String> {
    video_slug(url).map(|token| format!("{}{}/", EMBED_BASE, token))
}

/// Article slugs are the last non-empty path segment of the article's
/// canonical URL; query and fragment are excluded.
pub fn article_slug(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments = parsed.path_segments()?;
    segments
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
