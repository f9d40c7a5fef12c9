//! Assistant reply formatting
//!
//! Replies are split into segments first so that terminal front ends can
//! style them directly; `to_html` renders the same segments as markup.
//! Only code content is escaped. Surrounding prose is passed through as the
//! server sent it.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    LineBreak,
    InlineCode(String),
    CodeBlock { language: String, code: String },
}

fn fenced_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n(.*?)```").expect("valid fenced block regex")
    })
}

fn inline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"))
}

/// Split a reply into fenced blocks, inline code spans, prose and line breaks
pub fn parse_message(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in fenced_re().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        parse_prose(&content[last..whole.start()], &mut segments);

        let language = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "text".to_string());
        let code = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        segments.push(Segment::CodeBlock {
            language,
            code: code.to_string(),
        });
        last = whole.end();
    }
    parse_prose(&content[last..], &mut segments);

    segments
}

fn parse_prose(text: &str, segments: &mut Vec<Segment>) {
    let mut last = 0;
    for caps in inline_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&text[last..whole.start()], segments);
        let code = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        segments.push(Segment::InlineCode(code.to_string()));
        last = whole.end();
    }
    push_text(&text[last..], segments);
}

fn push_text(text: &str, segments: &mut Vec<Segment>) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::LineBreak);
        }
        if !line.is_empty() {
            segments.push(Segment::Text(line.to_string()));
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => html.push_str(text),
            Segment::LineBreak => html.push_str("<br>"),
            Segment::InlineCode(code) => {
                html.push_str("<code>");
                html.push_str(&escape_html(code));
                html.push_str("</code>");
            }
            Segment::CodeBlock { language, code } => {
                html.push_str(&format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>",
                    language,
                    escape_html(code)
                ));
            }
        }
    }
    html
}

/// Convert raw assistant text into markup
pub fn format_message(content: &str) -> String {
    to_html(&parse_message(content))
}
