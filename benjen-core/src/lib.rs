//! # benjen-core
//!
//! Core library for the benjen static site generator.
//!
//! This crate loads entries (markdown with a metadata header and the
//! `image[...]` gallery directive), splits them into the main and galley
//! streams, paginates them and assembles the RSS feed.

pub mod builder;
pub mod config;
pub mod feed;
pub mod markdown;
pub mod models;
pub mod pagination;

pub use builder::{BuildError, SiteBuilder};
pub use config::{Config, ConfigError};
pub use feed::{Feed, FeedError, FeedItem, FEED_FILE};
pub use markdown::{Converted, MarkdownProcessor};
pub use models::{Entry, EntryMeta, SiteIndex, Stream};
pub use pagination::{paginate, recent, sort_entries, Page};
