//! Content model structs for entries and the site index.

use crate::markdown::Metadata;
use serde::Serialize;

/// Tag that routes an entry to the galley stream
pub const GALLEY_TAG: &str = "galley";

/// Required and optional metadata of an entry, validated once at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub title: String,
    pub date: String,
    pub tags: Vec<String>,
}

impl EntryMeta {
    /// Returns `None` when `title` or `date` is missing.
    ///
    /// Every `tags` value line is split on commas and whitespace.
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        let title = meta.first("title")?.to_string();
        let date = meta.first("date")?.to_string();
        let tags = meta
            .get("tags")
            .unwrap_or_default()
            .iter()
            .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Some(Self { title, date, tags })
    }
}

/// A single post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: String,

    /// Publication date, compared as a string
    pub date: String,

    pub tags: Vec<String>,

    /// Original source text
    pub raw: String,

    /// Rendered body
    pub html: String,

    /// Output file name
    pub link: String,
}

impl Entry {
    pub fn new(meta: EntryMeta, raw: String, html: String) -> Self {
        let link = entry_link(&meta.date, &meta.title);
        Self {
            title: meta.title,
            date: meta.date,
            tags: meta.tags,
            raw,
            html,
            link,
        }
    }

    pub fn is_galley(&self) -> bool {
        self.tags.iter().any(|tag| tag == GALLEY_TAG)
    }
}

/// Output file name for an entry: `<date>_<sanitized title>.html`
pub fn entry_link(date: &str, title: &str) -> String {
    format!("{}_{}.html", date, sanitize_title(title))
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Which stream an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Main,
    Galley,
}

impl Stream {
    /// File name prefix of the stream's paginated pages
    pub fn page_prefix(&self) -> &'static str {
        match self {
            Stream::Main => "index",
            Stream::Galley => "galley",
        }
    }
}

/// The loaded site: both entry streams, each sorted newest first
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    pub main: Vec<Entry>,
    pub galley: Vec<Entry>,
}

impl SiteIndex {
    /// Route an entry to its stream
    pub fn push(&mut self, entry: Entry) {
        if entry.is_galley() {
            self.galley.push(entry);
        } else {
            self.main.push(entry);
        }
    }

    pub fn stream(&self, stream: Stream) -> &[Entry] {
        match stream {
            Stream::Main => &self.main,
            Stream::Galley => &self.galley,
        }
    }

    /// Every entry: main stream first, then galley
    pub fn all_entries(&self) -> impl Iterator<Item = &Entry> {
        self.main.iter().chain(self.galley.iter())
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.galley.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::split_metadata;

    fn meta(header: &str) -> Metadata {
        split_metadata(header).0
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Hello, World!"), "Hello__World_");
        assert_eq!(sanitize_title("keep_this-one"), "keep_this-one");
        assert_eq!(sanitize_title("Café"), "Caf_");
    }

    #[test]
    fn test_entry_link() {
        assert_eq!(entry_link("2020-01-03", "A day out"), "2020-01-03_A_day_out.html");
    }

    #[test]
    fn test_meta_requires_title_and_date() {
        assert!(EntryMeta::from_metadata(&meta("title: T\n")).is_none());
        assert!(EntryMeta::from_metadata(&meta("date: 2020-01-01\n")).is_none());

        let parsed = EntryMeta::from_metadata(&meta("title: T\ndate: 2020-01-01\n")).unwrap();
        assert_eq!(parsed.title, "T");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_tags_split_on_commas_and_spaces() {
        let parsed = EntryMeta::from_metadata(&meta(
            "title: T\ndate: D\ntags: travel, photos\n    galley\n",
        ))
        .unwrap();
        assert_eq!(parsed.tags, vec!["travel", "photos", "galley"]);
    }

    #[test]
    fn test_stream_routing() {
        let mut index = SiteIndex::default();
        let plain = EntryMeta {
            title: "a".into(),
            date: "1".into(),
            tags: vec!["rust".into()],
        };
        let galley = EntryMeta {
            title: "b".into(),
            date: "2".into(),
            tags: vec!["galley".into()],
        };
        index.push(Entry::new(plain, String::new(), String::new()));
        index.push(Entry::new(galley, String::new(), String::new()));

        assert_eq!(index.main.len(), 1);
        assert_eq!(index.galley.len(), 1);
        assert_eq!(index.stream(Stream::Galley)[0].title, "b");
        let titles: Vec<_> = index.all_entries().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
