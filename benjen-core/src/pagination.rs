//! Ordering and pagination of entry streams.

use crate::models::Entry;
use serde::Serialize;

/// Stable sort by date, newest first. Dates compare as plain strings.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// One rendered page of a stream
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    /// Output file name of this page
    #[serde(skip)]
    pub file_name: String,

    /// 1-based page number
    pub page: usize,

    /// Total number of pages in the stream
    pub pages: usize,

    pub prev: Option<String>,
    pub next: Option<String>,

    pub posts: &'a [Entry],

    /// Sidebar list shared by every page
    pub recent_posts: &'a [Entry],
}

/// File name of the page starting at `start` (`index.html`, `index_1.html`, ...)
pub fn page_file_name(prefix: &str, start: usize, per: usize) -> String {
    if start == 0 {
        format!("{}.html", prefix)
    } else {
        format!("{}_{}.html", prefix, start / per)
    }
}

/// The first `count` entries of a sorted stream
pub fn recent(entries: &[Entry], count: usize) -> &[Entry] {
    &entries[..count.min(entries.len())]
}

/// Split a stream into pages of `per` entries.
///
/// An empty stream yields no pages. `per` must be non-zero.
pub fn paginate<'a>(
    entries: &'a [Entry],
    per: usize,
    recent_posts: &'a [Entry],
    prefix: &str,
) -> Vec<Page<'a>> {
    assert!(per > 0, "page size must be non-zero");

    let pages = entries.len().div_ceil(per);

    (0..entries.len())
        .step_by(per)
        .map(|start| {
            let end = (start + per).min(entries.len());
            Page {
                file_name: page_file_name(prefix, start, per),
                page: start / per + 1,
                pages,
                prev: (start > 0).then(|| page_file_name(prefix, start - per, per)),
                next: (start + per < entries.len())
                    .then(|| page_file_name(prefix, start + per, per)),
                posts: &entries[start..end],
                recent_posts,
            }
        })
        .collect()
}
