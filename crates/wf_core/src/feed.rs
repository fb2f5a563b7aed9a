//! Query operations over an in-memory feed.
//!
//! Every operation takes the feed as a slice and never fails: windows
//! are clipped to the feed's bounds and a lookup miss is `None`.

use chrono::{DateTime, Utc};

use crate::slug;
use crate::types::{Article, Video};

/// A record that can be addressed by a derived slug and, when the feed
/// carries a usable timestamp, ordered by publication date.
pub trait Record {
    /// Derived page-local identifier, recomputed on every call.
    fn slug(&self) -> Option<String>;

    /// Publication timestamp, where the feed has a reliable one.
    /// Records without it keep their feed-native order.
    fn published_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

impl Record for Article {
    fn slug(&self) -> Option<String> {
        slug::article_slug(&self.url)
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

impl Record for Video {
    fn slug(&self) -> Option<String> {
        slug::video_slug(&self.link)
    }
}

/// The `n` most recent records: stable sort by publication timestamp
/// descending, then truncate. Records without a timestamp (videos)
/// keep their input order, so for them this is just "first n".
pub fn latest<T: Record + Clone>(n: usize, feed: &[T]) -> Vec<T> {
    let mut ordered = feed.to_vec();
    ordered.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
    ordered.truncate(n);
    ordered
}

/// Page `page_number` (1-based) of `page_size` records, clipped to the
/// feed's bounds; a page past the end is empty, not an error.
pub fn page<T>(page_number: usize, page_size: usize, feed: &[T]) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= feed.len() {
        return &[];
    }
    let end = feed.len().min(start.saturating_add(page_size));
    &feed[start..end]
}

/// Linear scan recomputing each record's slug; first match in feed
/// order wins. Feeds are tens to low hundreds of records read once per
/// page view, so O(len) is fine here.
pub fn find_by_slug<'a, T: Record>(slug: &str, feed: &'a [T]) -> Option<&'a T> {
    feed.iter().find(|record| record.slug().as_deref() == Some(slug))
}
