//! Metadata header extraction.
//!
//! Entries start with `key: value` lines, optionally fenced by `---`:
//!
//! ```text
//! title: A day out
//! date: 2020-01-03
//! tags: photos, galley
//!
//! Body starts here.
//! ```

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Metadata keys (lowercased) mapped to their value lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    values: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    /// All values recorded for a key
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(|v| v.as_slice())
    }

    /// The first value recorded for a key
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, key: &str, value: &str) {
        self.values
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
}

fn begin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-{3}(\s.*)?$").expect("valid regex"))
}

fn end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-{3}|\.{3})(\s.*)?$").expect("valid regex"))
}

fn meta_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[ ]{0,3}(?P<key>[A-Za-z0-9_-]+):\s*(?P<value>.*)$").expect("valid regex")
    })
}

fn more_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ ]{4,}(?P<value>.*)$").expect("valid regex"))
}

/// Split the metadata header off the top of `source`.
///
/// Returns the parsed metadata and the remaining markdown body.
pub fn split_metadata(source: &str) -> (Metadata, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut meta = Metadata::default();
    let mut key: Option<String> = None;
    let mut offset = 0;
    let mut first = true;

    for line in source.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);

        if first {
            first = false;
            if begin_regex().is_match(text) {
                offset += line.len();
                continue;
            }
        }

        if text.trim().is_empty() || end_regex().is_match(text) {
            offset += line.len();
            break;
        }

        if let Some(caps) = meta_regex().captures(text) {
            let name = caps["key"].to_lowercase();
            meta.push(&name, caps["value"].trim());
            key = Some(name);
        } else if let (Some(name), Some(caps)) = (&key, more_regex().captures(text)) {
            meta.push(name, caps["value"].trim());
        } else {
            break;
        }

        offset += line.len();
    }

    (meta, &source[offset..])
}
