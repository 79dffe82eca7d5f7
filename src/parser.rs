use crate::block::{Block, Document, List, ListItem, ListKind, Span};
use crate::config::ParserConfig;
use crate::escape::{decode_entities, escape_html};
use crate::fence::{self, Segment};
use crate::inline::parse_spans;

/// What a single prose line is, before inline parsing.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    ListItem { kind: ListKind, text: &'a str },
    Text(&'a str),
}

/// The block currently being accumulated.
#[derive(Default)]
enum OpenBlock {
    #[default]
    Idle,
    Paragraph(Vec<Span>),
    List(List),
}

struct ParseState<'c> {
    config: &'c ParserConfig,
    blocks: Vec<Block>,
    open: OpenBlock,
}

/// Parse a message into a document.
pub fn parse(markdown: &str, config: &ParserConfig) -> Document {
    let decoded = decode_entities(markdown);
    let mut state = ParseState::new(config);

    for segment in fence::split(&decoded) {
        match segment {
            Segment::Prose(lines) => {
                for line in lines {
                    state.push_line(line);
                }
                state.flush();
            }
            Segment::Fence { language, body } => {
                state.push_code_block(language, &body);
            }
        }
    }

    state.flush();
    log::debug!(
        "parsed {} bytes into {} blocks",
        markdown.len(),
        state.blocks.len()
    );
    Document::from(state.blocks)
}

impl<'c> ParseState<'c> {
    fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
            open: OpenBlock::Idle,
        }
    }

    fn inline(&self, text: &str) -> Vec<Span> {
        parse_spans(text, self.config.max_inline_depth)
    }

    /// Close whatever block is open and emit it if it has content.
    fn flush(&mut self) {
        match std::mem::take(&mut self.open) {
            OpenBlock::Idle => {}
            OpenBlock::Paragraph(content) => {
                if !content.is_empty() {
                    self.blocks.push(Block::Paragraph { content });
                }
            }
            OpenBlock::List(list) => {
                if !list.items.is_empty() {
                    self.blocks.push(Block::List(list));
                }
            }
        }
    }

    fn push_line(&mut self, line: &str) {
        match classify(line) {
            Line::Blank => self.flush(),
            Line::Heading { level, text } => {
                self.flush();
                let content = self.inline(text);
                if !content.is_empty() {
                    self.blocks.push(Block::Heading { level, content });
                }
            }
            Line::ListItem { text, .. } if text.is_empty() => {}
            Line::ListItem { kind, text } => {
                let content = self.inline(text);
                if !matches!(&self.open, OpenBlock::List(list) if list.kind == kind) {
                    self.flush();
                    self.open = OpenBlock::List(List::new(kind));
                }
                if let OpenBlock::List(list) = &mut self.open {
                    list.items.push(ListItem { content });
                }
            }
            Line::Text(text) => {
                let content = self.inline(text);
                if let OpenBlock::Paragraph(spans) = &mut self.open {
                    spans.push(Span::LineBreak);
                    spans.extend(content);
                } else {
                    self.flush();
                    self.open = OpenBlock::Paragraph(content);
                }
            }
        }
    }

    fn push_code_block(&mut self, language: Option<&str>, body: &[&str]) {
        self.flush();
        let language = language.unwrap_or(&self.config.default_language);
        self.blocks.push(Block::CodeBlock {
            language: escape_html(language),
            code: escape_html(&body.join("\n")),
        });
    }
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Line::Blank;
    }

    if let Some((level, text)) = heading(trimmed) {
        return Line::Heading { level, text };
    }

    if let Some(text) = unordered_item(trimmed) {
        return Line::ListItem {
            kind: ListKind::Unordered,
            text,
        };
    }

    if let Some(text) = ordered_item(trimmed) {
        return Line::ListItem {
            kind: ListKind::Ordered,
            text,
        };
    }

    Line::Text(trimmed.trim_end())
}

/// `#`..`######` followed by a space or the end of the line.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

/// `-`, `*` or `+` followed by a space. A marker alone on its line is an
/// empty item.
fn unordered_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(['-', '*', '+'])?;
    if rest.trim().is_empty() {
        return Some("");
    }
    let text = rest.strip_prefix(' ')?;
    Some(text.trim())
}

/// Digits, `.`, then a space.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let text = line[digits..].strip_prefix(". ")?;
    Some(text.trim())
}
