use crate::block::{Block, Document, List, Span};
use crate::config::HtmlConfig;
use crate::escape::push_escaped;

/// Convert a document to an HTML fragment.
///
/// Payloads in the document are already escaped and are copied as-is; only
/// config values are escaped here.
pub fn document_to_html(document: &Document, config: &HtmlConfig) -> String {
    let mut out = String::new();

    let wrapped = !config.wrapper_class.is_empty();
    if wrapped {
        out.push_str("<div class=\"");
        push_escaped(&config.wrapper_class, &mut out);
        out.push_str("\">\n");
    }

    for block in document {
        emit_block(block, config, &mut out);
        out.push('\n');
    }

    if wrapped {
        out.push_str("</div>\n");
    }

    out
}

fn emit_block(block: &Block, config: &HtmlConfig, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>"));
            spans_to_html(content, out);
            out.push_str(&format!("</h{level}>"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            spans_to_html(content, out);
            out.push_str("</p>");
        }
        Block::CodeBlock { language, code } => {
            out.push_str("<pre><code class=\"");
            push_escaped(&config.code_class_prefix, out);
            out.push_str(language);
            out.push_str("\">");
            out.push_str(code);
            out.push_str("</code></pre>");
        }
        Block::List(list) => list_to_html(list, out),
    }
}

fn list_to_html(list: &List, out: &mut String) {
    let tag = if list.is_ordered() { "ol" } else { "ul" };

    out.push('<');
    out.push_str(tag);
    out.push('>');
    for item in &list.items {
        out.push_str("<li>");
        spans_to_html(&item.content, out);
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_html(span, out);
    }
}

fn span_to_html(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) => out.push_str(text),
        Span::Bold(inner) => {
            out.push_str("<strong>");
            spans_to_html(inner, out);
            out.push_str("</strong>");
        }
        Span::Italic(inner) => {
            out.push_str("<em>");
            spans_to_html(inner, out);
            out.push_str("</em>");
        }
        Span::Code(code) => {
            out.push_str("<code>");
            out.push_str(code);
            out.push_str("</code>");
        }
        Span::LineBreak => out.push_str("<br>"),
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, render_to_html, render_to_html_with_config};

    #[test]
    fn heading() {
        assert_eq!(render_to_html("# Hello"), "<h1>Hello</h1>\n");
        assert_eq!(render_to_html("### Scope 3"), "<h3>Scope 3</h3>\n");
    }

    #[test]
    fn paragraph_with_break() {
        assert_eq!(
            render_to_html("line one\nline two"),
            "<p>line one<br>line two</p>\n"
        );
    }

    #[test]
    fn bold_italic_and_code() {
        assert_eq!(
            render_to_html("**bold** and *italic* and `code`"),
            "<p><strong>bold</strong> and <em>italic</em> and <code>code</code></p>\n"
        );
        assert_eq!(
            render_to_html("***both***"),
            "<p><strong><em>both</em></strong></p>\n"
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            render_to_html("- one\n- two"),
            "<ul><li>one</li><li>two</li></ul>\n"
        );
        assert_eq!(
            render_to_html("1. one\n2. two"),
            "<ol><li>one</li><li>two</li></ol>\n"
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            render_to_html("```rust\nlet x = 1 < 2;\n```"),
            "<pre><code class=\"language-rust\">let x = 1 &lt; 2;</code></pre>\n"
        );
        assert_eq!(
            render_to_html("```\nplain\n```"),
            "<pre><code class=\"language-plaintext\">plain</code></pre>\n"
        );
    }

    #[test]
    fn hostile_language_tag_is_escaped() {
        assert_eq!(
            render_to_html("```\"><img\nx\n```"),
            "<pre><code class=\"language-&quot;&gt;&lt;img\">x</code></pre>\n"
        );
    }

    #[test]
    fn script_never_reaches_output() {
        let html = render_to_html("<script>alert(1)</script>\n\n- <img src=x onerror=alert(1)>");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>\n<ul><li>&lt;img src=x onerror=alert(1)&gt;</li></ul>\n"
        );
    }

    #[test]
    fn wrapper_class() {
        let mut config = Config::default();
        config.html.wrapper_class = "chat-md".to_string();
        config.html.code_class_prefix = "lang-".to_string();
        assert_eq!(
            render_to_html_with_config("hi\n```py\nx\n```", &config),
            "<div class=\"chat-md\">\n<p>hi</p>\n<pre><code class=\"lang-py\">x</code></pre>\n</div>\n"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_to_html(""), "");
        assert_eq!(render_to_html(None), "");
    }
}
