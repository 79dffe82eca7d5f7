//! Inline span parsing: emphasis, code spans and escaped text.
//!
//! The scan is a single left-to-right pass over byte offsets. All delimiters
//! are ASCII, so every offset we slice at is a char boundary.

use crate::block::Span;
use crate::escape::escape_html;

/// Nesting depth used by [`parse_inline`].
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Bytes that can start something other than plain text.
const SPECIAL: &[u8] = b"\\*_`";

/// Characters a backslash turns into literal text.
const ESCAPABLE: &[u8] = b"\\*_`#";

/// Emphasis searches already known to fail within one `parse_spans` call.
///
/// A closer search that ran to the end of the text without success fails for
/// every later opener of the same kind too, so each kind is scanned to the end
/// at most once per call.
#[derive(Default)]
struct Misses {
    /// Earliest content start that found no closer, per [`Misses::slot`].
    from: [Option<usize>; 4],
}

impl Misses {
    fn slot(delim: u8, width: usize) -> usize {
        usize::from(delim == b'_') * 2 + (width - 1)
    }
}

struct Emphasis<'a> {
    strong: bool,
    inner: &'a str,
    end: usize,
}

/// Parse one line of inline markdown into spans.
pub fn parse_inline(text: &str) -> Vec<Span> {
    parse_spans(text, DEFAULT_MAX_DEPTH)
}

/// Parse inline markdown, allowing at most `depth_left` levels of emphasis.
/// Deeper delimiters are kept as literal text.
pub(crate) fn parse_spans(text: &str, depth_left: usize) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut misses = Misses::default();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if bytes.get(pos + 1).is_some_and(|b| ESCAPABLE.contains(b)) => {
                plain.push(char::from(bytes[pos + 1]));
                pos += 2;
            }
            b'*' | b'_' => {
                if depth_left > 0 {
                    if let Some(emphasis) = match_emphasis(text, pos, &mut misses) {
                        flush_text(&mut plain, &mut spans);
                        let inner = parse_spans(emphasis.inner, depth_left - 1);
                        spans.push(if emphasis.strong {
                            Span::Bold(inner)
                        } else {
                            Span::Italic(inner)
                        });
                        pos = emphasis.end;
                        continue;
                    }
                }
                plain.push(char::from(bytes[pos]));
                pos += 1;
            }
            b'`' => {
                let run = run_length(bytes, pos, b'`');
                match match_code(text, pos, run) {
                    Some((code, end)) => {
                        flush_text(&mut plain, &mut spans);
                        spans.push(Span::Code(escape_html(code)));
                        pos = end;
                    }
                    None => {
                        // Unmatched run: literal, and none of its ticks may open a shorter span
                        plain.push_str(&text[pos..pos + run]);
                        pos += run;
                    }
                }
            }
            _ => {
                let next = bytes[pos + 1..]
                    .iter()
                    .position(|b| SPECIAL.contains(b))
                    .map_or(bytes.len(), |offset| pos + 1 + offset);
                plain.push_str(&text[pos..next]);
                pos = next;
            }
        }
    }

    flush_text(&mut plain, &mut spans);
    spans
}

fn flush_text(plain: &mut String, spans: &mut Vec<Span>) {
    if !plain.is_empty() {
        spans.push(Span::Text(escape_html(plain)));
        plain.clear();
    }
}

fn run_length(bytes: &[u8], start: usize, byte: u8) -> usize {
    bytes[start..].iter().take_while(|&&b| b == byte).count()
}

/// Try `**x**`/`__x__` first, then `*x*`/`_x_`, at `pos`.
fn match_emphasis<'t>(text: &'t str, pos: usize, misses: &mut Misses) -> Option<Emphasis<'t>> {
    let bytes = text.as_bytes();
    let delim = bytes[pos];

    // snake_case guard
    if delim == b'_' && text[..pos].chars().next_back().is_some_and(char::is_alphanumeric) {
        return None;
    }

    if bytes.get(pos + 1) == Some(&delim) {
        if let Some(close) = find_closer(text, pos + 2, delim, 2, misses) {
            return Some(Emphasis {
                strong: true,
                inner: &text[pos + 2..close],
                end: close + 2,
            });
        }
    }

    let close = find_closer(text, pos + 1, delim, 1, misses)?;
    Some(Emphasis {
        strong: false,
        inner: &text[pos + 1..close],
        end: close + 1,
    })
}

/// Find the shortest closing delimiter for content starting at `start`.
///
/// Content is non-empty and neither starts nor ends with whitespace. The scan
/// steps over whole delimiter runs: a single delimiter closes on a run of one
/// (or three and more, where it takes the last character), a double delimiter
/// on a run of two or more. Escaped runs never close, and a `_` run must not
/// be followed by an alphanumeric character.
///
/// Only maximal runs after the one holding `start` are candidates, so the
/// candidates of a later start are a subset of an earlier one's.
fn find_closer(
    text: &str,
    start: usize,
    delim: u8,
    width: usize,
    misses: &mut Misses,
) -> Option<usize> {
    let bytes = text.as_bytes();
    let first = text.get(start..)?.chars().next()?;
    if first.is_whitespace() || (width == 1 && first == char::from(delim)) {
        return None;
    }

    let slot = Misses::slot(delim, width);
    if misses.from[slot].is_some_and(|from| start >= from) {
        return None;
    }

    let mut i = start + run_length(bytes, start, delim).max(1);
    while i < bytes.len() {
        if bytes[i] != delim {
            i += 1;
            continue;
        }

        let run = run_length(bytes, i, delim);
        let run_end = i + run;
        let fits = if width == 1 { run == 1 || run >= 3 } else { run >= 2 };

        if fits
            && bytes[i - 1] != b'\\'
            && !text[..i].chars().next_back().is_some_and(char::is_whitespace)
            && !(delim == b'_'
                && text[run_end..]
                    .chars()
                    .next()
                    .is_some_and(char::is_alphanumeric))
        {
            return Some(run_end - width);
        }
        i = run_end;
    }

    misses.from[slot] = Some(start);
    None
}

/// Match a code span opened by `run` backticks at `start`. The closer is the
/// next run of exactly `run` backticks.
fn match_code(text: &str, start: usize, run: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let body_start = start + run;
    let mut i = body_start;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }

        let close_run = run_length(bytes, i, b'`');
        if close_run == run && i > body_start {
            let mut code = &text[body_start..i];
            if run > 1
                && code.len() > 2
                && code.starts_with(' ')
                && code.ends_with(' ')
                && !code.trim().is_empty()
            {
                code = &code[1..code.len() - 1];
            }
            return Some((code, i + close_run));
        }
        i += close_run;
    }

    None
}
