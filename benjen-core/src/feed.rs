//! RSS 2.0 feed assembly.

use crate::models::Entry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

/// Output file name of the feed
pub const FEED_FILE: &str = "feed.xml";

const RSS_DOCS: &str = "https://www.rssboard.org/rss-specification";
const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Entry '{title}' has an unparseable date '{date}' (expected YYYY-MM-DD)")]
    InvalidDate { title: String, date: String },
}

/// One `<item>` of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub guid: String,
    pub pub_date: NaiveDateTime,
}

impl FeedItem {
    /// Map an entry to a feed item linked under `root_url`
    pub fn from_entry(entry: &Entry, root_url: &str) -> Result<Self, FeedError> {
        let link = format!("{}{}", root_url, entry.link);
        let day = entry.date.get(..10).unwrap_or(entry.date.as_str());
        let pub_date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| FeedError::InvalidDate {
                title: entry.title.clone(),
                date: entry.date.clone(),
            })?;

        Ok(Self {
            title: entry.title.clone(),
            link: link.clone(),
            description: entry.html.clone(),
            guid: link,
            pub_date,
        })
    }
}

/// The feed channel and its items
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build_date: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

impl Feed {
    /// Build a feed over `entries`, in the order given
    pub fn new<'a>(
        title: &str,
        description: &str,
        root_url: &str,
        last_build_date: DateTime<Utc>,
        entries: impl IntoIterator<Item = &'a Entry>,
    ) -> Result<Self, FeedError> {
        let items = entries
            .into_iter()
            .map(|entry| FeedItem::from_entry(entry, root_url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: title.to_string(),
            link: root_url.to_string(),
            description: description.to_string(),
            last_build_date,
            items,
        })
    }

    /// Serialize as an RSS 2.0 document
    pub fn to_xml(&self) -> String {
        let mut items = String::new();
        for item in &self.items {
            items.push_str(&format!(
                "<item><title>{}</title><link>{}</link><description>{}</description><guid isPermaLink=\"true\">{}</guid><pubDate>{}</pubDate></item>",
                escape_xml(&item.title),
                escape_xml(&item.link),
                escape_xml(&item.description),
                escape_xml(&item.guid),
                item.pub_date.format(RFC822_FORMAT)
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"><channel><title>{}</title><link>{}</link><description>{}</description><lastBuildDate>{}</lastBuildDate><generator>benjen</generator><docs>{}</docs>{}</channel></rss>
"#,
            escape_xml(&self.title),
            escape_xml(&self.link),
            escape_xml(&self.description),
            self.last_build_date.format(RFC822_FORMAT),
            RSS_DOCS,
            items
        )
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
