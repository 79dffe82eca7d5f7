//! Renders assistant chat messages written in a small markdown subset into a
//! tree of typed, HTML-escaped content nodes.
//!
//! Supported: `#` headings, paragraphs, `-`/`*`/`+` and `1.` lists, fenced
//! code blocks, and inline `**bold**`, `*italic*` and `` `code` ``. Rendering
//! never fails; anything malformed comes back as escaped literal text.

mod block;
mod config;
mod escape;
mod fence;
mod html;
mod inline;
mod parser;

pub use block::{Block, Document, List, ListItem, ListKind, Span};
pub use config::{Config, HtmlConfig, ParserConfig};
pub use escape::{decode_entities, escape_html};
pub use inline::parse_inline;

use std::sync::LazyLock;

/// Parsed once; `render` and `render_to_html` run per chat message.
static DEFAULT_CONFIG: LazyLock<Config> = LazyLock::new(Config::compiled_default);

/// The options from `default_config.toml`, shared by the default renderers.
pub fn default_config() -> &'static Config {
    &DEFAULT_CONFIG
}

/// Render a message into a document using default config.
///
/// Accepts `&str` or `Option<&str>`; `None` gives an empty document.
pub fn render<'a>(markdown: impl Into<Option<&'a str>>) -> Document {
    render_with_config(markdown, default_config())
}

/// Render a message into a document with custom config.
pub fn render_with_config<'a>(markdown: impl Into<Option<&'a str>>, config: &Config) -> Document {
    match markdown.into() {
        Some(markdown) => parser::parse(markdown, &config.parser),
        None => Document::default(),
    }
}

/// Render a message straight to an HTML fragment using default config.
pub fn render_to_html<'a>(markdown: impl Into<Option<&'a str>>) -> String {
    render_to_html_with_config(markdown, default_config())
}

/// Render a message straight to an HTML fragment with custom config.
pub fn render_to_html_with_config<'a>(
    markdown: impl Into<Option<&'a str>>,
    config: &Config,
) -> String {
    let document = render_with_config(markdown, config);
    html::document_to_html(&document, &config.html)
}

/// Convert an already rendered document to HTML.
pub fn document_to_html(document: &Document, config: &HtmlConfig) -> String {
    html::document_to_html(document, config)
}
