//! Markdown processing pipeline with custom extensions.

pub mod extension;
pub mod highlight;
pub mod lightbox;
pub mod meta;
pub mod node;

use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;

pub use extension::{BlockExtension, BlockRegistry, Position};
pub use highlight::HighlightTransformer;
pub use lightbox::{Directive, DirectiveError, LightboxExtension};
pub use meta::{split_metadata, Metadata};
pub use node::Node;

#[derive(Error, Debug)]
pub enum MarkdownError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),
}

/// Result of converting one source document
#[derive(Debug, Clone)]
pub struct Converted {
    pub html: String,
    pub meta: Metadata,
}

/// Markdown processor with custom extensions
pub struct MarkdownProcessor {
    options: Options,
    blocks: BlockRegistry,
    highlighter: HighlightTransformer,
}

impl MarkdownProcessor {
    /// Processor with the lightbox directive installed
    pub fn new() -> Self {
        let mut processor = Self::bare();
        lightbox::extend(&mut processor.blocks);
        processor
    }

    /// Processor without any block extensions
    pub fn bare() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        Self {
            options,
            blocks: BlockRegistry::new(),
            highlighter: HighlightTransformer::new(),
        }
    }

    /// Convert a source document to HTML, extracting its metadata header
    pub fn convert(&self, source: &str) -> Result<Converted, MarkdownError> {
        let (meta, body) = split_metadata(source);

        let parser = Parser::new_ext(body, self.options).into_offset_iter();
        let events = self.blocks.apply(body, parser)?;
        let events = self.highlighter.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(Converted {
            html: html_output,
            meta,
        })
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}
