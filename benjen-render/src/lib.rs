//! # benjen-render
//!
//! Template rendering library for benjen.
//!
//! This crate loads the site's template directory into Tera and renders
//! the index, archive, post and passthrough pages.

pub mod templates;

pub use templates::{ArchiveContext, PostContext, RenderError, SiteTemplates, RESERVED_TEMPLATES};
