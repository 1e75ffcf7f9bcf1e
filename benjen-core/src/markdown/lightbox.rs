//! Lightbox gallery directive.
//!
//! A block such as
//!
//! ```text
//! image[P1000061, mygroup, My clever caption text]
//! ```
//!
//! is rewritten to
//!
//! ```html
//! <div class="single"><a href="img/P1000061.small.jpg" rel="lightbox[mygroup]" title="My clever caption text"><img src="img/P1000061.thumb.jpg" alt="My clever caption text" /></a></div>
//! ```
//!
//! Fields are split on every comma, so captions cannot contain commas.

use super::extension::{BlockExtension, BlockRegistry, Position};
use super::node::Node;
use thiserror::Error;

const PREFIX: &str = "image[";
const FIELDS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("Unterminated image directive (missing `]`): {0}")]
    Unterminated(String),

    #[error("Image directive expects {expected} comma-separated fields, got {found}: {payload}")]
    FieldCount {
        expected: usize,
        found: usize,
        payload: String,
    },
}

/// Parsed `image[name, group, caption]` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub group: String,
    pub caption: String,
}

impl Directive {
    /// Parse a block beginning with `image[`.
    ///
    /// Only the first line is considered; the payload ends at the first `]`.
    pub fn parse(block: &str) -> Result<Self, DirectiveError> {
        let first_line = block.lines().next().unwrap_or_default();
        let rest = first_line.strip_prefix(PREFIX).unwrap_or(first_line);
        let close = rest
            .find(']')
            .ok_or_else(|| DirectiveError::Unterminated(first_line.to_string()))?;
        let payload = &rest[..close];

        let fields: Vec<&str> = payload.split(',').collect();
        if fields.len() != FIELDS {
            return Err(DirectiveError::FieldCount {
                expected: FIELDS,
                found: fields.len(),
                payload: payload.to_string(),
            });
        }

        Ok(Self {
            name: fields[0].to_string(),
            group: fields[1].trim_start().to_string(),
            caption: fields[2].trim_start().to_string(),
        })
    }

    pub fn to_node(&self) -> Node {
        let img = Node::new("img")
            .attr("src", format!("img/{}.thumb.jpg", self.name))
            .attr("alt", self.caption.as_str());
        let link = Node::new("a")
            .attr("href", format!("img/{}.small.jpg", self.name))
            .attr("rel", format!("lightbox[{}]", self.group))
            .attr("title", self.caption.as_str())
            .child(img);
        Node::new("div").attr("class", "single").child(link)
    }
}

/// Block extension recognizing the `image[...]` directive
#[derive(Debug, Default)]
pub struct LightboxExtension;

impl BlockExtension for LightboxExtension {
    fn name(&self) -> &str {
        "lightbox"
    }

    fn recognizes(&self, block: &str) -> bool {
        block.starts_with(PREFIX)
    }

    fn rewrite(&self, block: &str) -> Result<Node, DirectiveError> {
        Directive::parse(block).map(|directive| directive.to_node())
    }
}

/// Install the lightbox directive ahead of every other block handler
pub fn extend(registry: &mut BlockRegistry) {
    registry.register(Box::new(LightboxExtension), Position::Begin);
}
