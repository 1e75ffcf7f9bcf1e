//! Block-level extension hook for the markdown pipeline.
//!
//! Each paragraph, heading and tight list item is offered, as raw source
//! text, to the registered extensions before it is emitted. The first
//! extension that recognizes the block replaces it with its own node tree.

use super::lightbox::DirectiveError;
use super::node::Node;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::ops::Range;

/// A custom block handler
pub trait BlockExtension {
    /// Unique name within a registry
    fn name(&self) -> &str;

    /// Whether this extension handles the given raw block
    fn recognizes(&self, block: &str) -> bool;

    /// Produce the replacement for a recognized block
    fn rewrite(&self, block: &str) -> Result<Node, DirectiveError>;
}

/// Where a new extension is inserted in the handler chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Highest priority, consulted before everything else
    Begin,
    End,
}

/// Ordered chain of block extensions
#[derive(Default)]
pub struct BlockRegistry {
    handlers: Vec<Box<dyn BlockExtension>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extension, replacing any existing one with the same name
    pub fn register(&mut self, extension: Box<dyn BlockExtension>, position: Position) {
        self.handlers.retain(|h| h.name() != extension.name());
        match position {
            Position::Begin => self.handlers.insert(0, extension),
            Position::End => self.handlers.push(extension),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    fn find(&self, block: &str) -> Option<&dyn BlockExtension> {
        self.handlers
            .iter()
            .find(|h| h.recognizes(block))
            .map(|h| &**h)
    }

    /// Run the chain over an offset-annotated event stream.
    ///
    /// `source` must be the text the offsets refer to.
    pub fn apply<'a>(
        &self,
        source: &'a str,
        events: impl IntoIterator<Item = (Event<'a>, Range<usize>)>,
    ) -> Result<Vec<Event<'a>>, DirectiveError> {
        let mut events = events.into_iter().peekable();
        let mut out = Vec::new();

        while let Some((event, range)) = events.next() {
            let block = match &event {
                Event::Start(Tag::Paragraph) | Event::Start(Tag::Heading { .. }) => {
                    source.get(range)
                }
                // Tight list items hold their text without a paragraph
                Event::Start(Tag::Item) => match events.peek() {
                    Some((Event::Text(_), inner)) => source.get(inner.start..range.end),
                    _ => None,
                },
                _ => None,
            };

            let Some((handler, block)) = block.and_then(|b| self.find(b).map(|h| (h, b))) else {
                out.push(event);
                continue;
            };

            tracing::debug!("Block extension {} matched", handler.name());
            let node = handler.rewrite(block)?;
            let mut html = node.to_html();
            html.push('\n');
            let html = Event::Html(CowStr::Boxed(html.into_boxed_str()));

            if matches!(event, Event::Start(Tag::Item)) {
                out.push(event);
                out.push(html);
                skip_block(&mut events);
                out.push(Event::End(TagEnd::Item));
            } else {
                out.push(html);
                skip_block(&mut events);
            }
        }

        Ok(out)
    }
}

/// Consume events up to and including the end of the block just opened
fn skip_block<'a>(events: &mut impl Iterator<Item = (Event<'a>, Range<usize>)>) {
    let mut depth = 1usize;
    for (event, _) in events {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            break;
        }
    }
}
