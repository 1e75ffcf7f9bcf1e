//! Code syntax highlighting using syntect.
//!
//! The language is never guessed. Fenced blocks use their info string;
//! indented blocks may name one on their first line with `:::lang` or a
//! shebang (`#!lang` is dropped, `#!/usr/bin/lang` is kept).

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Option<Theme>> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME
        .get_or_init(|| {
            let theme_set = ThemeSet::load_defaults();
            theme_set
                .themes
                .get("InspiredGitHub")
                .or_else(|| theme_set.themes.get("base16-ocean.light"))
                .cloned()
        })
        .as_ref()
}

/// Transformer for syntax highlighting code blocks
#[derive(Debug, Default)]
pub struct HighlightTransformer;

impl HighlightTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Transform events, replacing code blocks with highlighted HTML
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_block: Option<CodeBlockKind<'a>> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(kind);
                    code_content.clear();
                }
                Event::Text(text) if code_block.is_some() => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                    let kind = code_block.take();
                    let (lang, code) = match &kind {
                        Some(CodeBlockKind::Fenced(info)) => {
                            let token = info.split_whitespace().next().unwrap_or_default();
                            let lang = (!token.is_empty()).then(|| token.to_string());
                            (lang, code_content.clone())
                        }
                        _ => split_language_marker(&code_content),
                    };

                    match lang {
                        Some(lang) => {
                            let highlighted = self.highlight_code(&code, &lang);
                            result.push(Event::Html(CowStr::Boxed(highlighted.into_boxed_str())));
                        }
                        None => {
                            // No language given: plain pre/code
                            result.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)));
                            result.push(Event::Text(CowStr::Boxed(code.into_boxed_str())));
                            result.push(Event::End(TagEnd::CodeBlock));
                        }
                    }
                }
                other => result.push(other),
            }
        }

        result
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let ss = syntax_set();
        let syntax = ss
            .find_syntax_by_token(lang)
            .or_else(|| ss.find_syntax_by_extension(lang))
            .unwrap_or_else(|| ss.find_syntax_plain_text());

        let highlighted = theme()
            .and_then(|theme| highlighted_html_for_string(code, ss, syntax, theme).ok())
            .unwrap_or_else(|| format!("<pre><code>{}</code></pre>", html_escape(code)));

        format!("<div class=\"codehilite\">{}</div>\n", highlighted)
    }
}

/// Detect a `:::lang` or shebang marker on the first line of an indented block
fn split_language_marker(code: &str) -> (Option<String>, String) {
    let (first, rest) = code.split_once('\n').unwrap_or((code, ""));
    let first = first.trim();

    if let Some(lang) = first.strip_prefix(":::") {
        if !lang.trim().is_empty() {
            return (Some(lang.trim().to_string()), rest.to_string());
        }
    }

    if let Some(shebang) = first.strip_prefix("#!") {
        let shebang = shebang.trim();
        if shebang.contains('/') {
            let lang = shebang
                .split_whitespace()
                .next()
                .and_then(|path| path.rsplit('/').next())
                .filter(|name| !name.is_empty());
            if let Some(lang) = lang {
                return (Some(lang.to_string()), code.to_string());
            }
        } else if !shebang.is_empty() {
            return (Some(shebang.to_string()), rest.to_string());
        }
    }

    (None, code.to_string())
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
