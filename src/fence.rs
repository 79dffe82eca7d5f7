//! Splits a message into fenced code segments and everything else.

/// A run of input lines, either prose to classify or a closed code fence.
#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(Vec<&'a str>),
    Fence {
        language: Option<&'a str>,
        body: Vec<&'a str>,
    },
}

struct Opener<'a> {
    ticks: usize,
    language: Option<&'a str>,
}

/// Split `text` on fenced code blocks.
///
/// A fence without a matching closer is not a code block; its opening line is
/// returned as prose and scanning continues on the next line.
pub fn split(text: &str) -> Vec<Segment<'_>> {
    let lines: Vec<&str> = text.lines().collect();
    let closers: Vec<usize> = lines.iter().map(|l| closer_ticks(l)).collect();

    // widest[i]: most backticks on any closing line at or after line i
    let mut widest = vec![0; lines.len() + 1];
    for i in (0..lines.len()).rev() {
        widest[i] = widest[i + 1].max(closers[i]);
    }

    let mut segments = Vec::new();
    let mut prose = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(opener) = parse_opener(line) {
            let close = if widest[i + 1] >= opener.ticks {
                closers[i + 1..]
                    .iter()
                    .position(|&ticks| ticks >= opener.ticks)
                    .map(|offset| i + 1 + offset)
            } else {
                None
            };

            if let Some(close) = close {
                if !prose.is_empty() {
                    segments.push(Segment::Prose(std::mem::take(&mut prose)));
                }
                segments.push(Segment::Fence {
                    language: opener.language,
                    body: lines[i + 1..close].to_vec(),
                });
                i = close + 1;
                continue;
            }

            log::trace!("unterminated code fence at line {}, keeping as text", i + 1);
        }

        prose.push(line);
        i += 1;
    }

    if !prose.is_empty() {
        segments.push(Segment::Prose(prose));
    }

    segments
}

fn parse_opener(line: &str) -> Option<Opener<'_>> {
    let trimmed = line.trim_start();
    let ticks = trimmed.bytes().take_while(|&b| b == b'`').count();
    if ticks < 3 {
        return None;
    }

    let info = trimmed[ticks..].trim();
    if info.contains('`') {
        return None;
    }

    Some(Opener {
        ticks,
        language: info.split_whitespace().next(),
    })
}

/// Backtick count of a line made only of backticks, 0 for any other line.
fn closer_ticks(line: &str) -> usize {
    let trimmed = line.trim();
    if trimmed.bytes().all(|b| b == b'`') {
        trimmed.len()
    } else {
        0
    }
}
