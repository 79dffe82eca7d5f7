//! HTML escaping for stored payloads and entity decoding for raw input.

/// Longest entity body we bother looking at, e.g. `#x10FFFF`.
const MAX_ENTITY_LEN: usize = 10;

/// Escape the characters that are unsafe in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(text, &mut out);
    out
}

/// Append `text` to `out`, escaped.
pub fn push_escaped(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Decode the HTML entities a chat backend is likely to send.
///
/// Named: `amp`, `lt`, `gt`, `quot`, `apos`, `nbsp`. Numeric: decimal and hex.
/// Anything else, including a reference without its `;`, is kept as-is.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        match decode_one(after) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the reference at the start of `text` (just after `&`).
/// Returns the character and the number of bytes consumed, including `;`.
fn decode_one(text: &str) -> Option<(char, usize)> {
    let semi = text
        .bytes()
        .take(MAX_ENTITY_LEN + 1)
        .position(|b| b == b';')?;
    let body = &text[..semi];

    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => decode_numeric(body)?,
    };

    Some((ch, semi + 1))
}

fn decode_numeric(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse::<u32>().ok()?
        }
        _ => return None,
    };

    if code == 0 {
        return Some(char::REPLACEMENT_CHARACTER);
    }
    Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_unsafe_chars() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn decodes_named_entities() {
        assert_eq!(
            decode_entities("&lt;b&gt; &amp; &quot;q&quot; &apos;s&apos;"),
            "<b> & \"q\" 's'"
        );
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn decodes_numeric_entities() {
        assert_eq!(decode_entities("&#39;&#x27;&#X41;&#8364;"), "''A€");
        assert_eq!(decode_entities("&#0;"), "\u{fffd}");
        assert_eq!(decode_entities("&#xD800;"), "\u{fffd}");
        assert_eq!(decode_entities("&#99999999;"), "\u{fffd}");
    }

    #[test]
    fn leaves_unknown_and_malformed_references() {
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&copy;"), "&copy;");
        assert_eq!(decode_entities("&amp"), "&amp");
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#x;"), "&#x;");
        assert_eq!(decode_entities("&#12a;"), "&#12a;");
        assert_eq!(decode_entities("& ;"), "& ;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn decodes_only_one_level() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn decode_then_escape_is_stable() {
        let raw = "& < > \" '";
        let escaped = escape_html(raw);
        assert_eq!(escaped, "&amp; &lt; &gt; &quot; &#39;");
        assert_eq!(escape_html(&decode_entities(&escaped)), escaped);
    }
}
