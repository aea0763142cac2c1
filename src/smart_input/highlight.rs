//! Live highlighting of task input
//!
//! Produces an HTML fragment that echoes the raw input with every recognised
//! token wrapped in a styled `<span>`. The input is escaped before any markup
//! is added, so user text can never become structural markup.

use super::{TokenKind, TokenSpan, token_spans};
use crate::sessions::Priority;

const SECTION_CLASS: &str = "text-primary font-medium";
const DATE_CLASS: &str = "text-emerald-500 font-medium";
/// Placeholder keeping an empty overlay element from collapsing
const EMPTY_PLACEHOLDER: &str = "&nbsp;";

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn priority_class(priority: Option<Priority>) -> &'static str {
    match priority {
        Some(Priority::Urgent) => "text-red-500",
        Some(Priority::High) => "text-orange-500",
        Some(Priority::Medium) => "text-blue-500",
        Some(Priority::Low) => "text-slate-400",
        None => "text-foreground",
    }
}

fn span_class(span: &TokenSpan, escaped: &str) -> String {
    match span.kind {
        TokenKind::Section => SECTION_CLASS.to_string(),
        TokenKind::DueTag | TokenKind::DateWord => DATE_CLASS.to_string(),
        TokenKind::Priority | TokenKind::PriorityShortcut => {
            format!("{} font-medium", priority_class(span.priority(escaped)))
        }
    }
}

/// Render `input` as an HTML fragment with tokens highlighted
///
/// Priority tokens are styled by the level they resolve to, so `!urgent`
/// and `p1` look the same. A token nested in another (`today` inside
/// `due:today`) is rendered as part of the outer span.
pub fn highlight(input: &str) -> String {
    if input.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    let escaped = escape_html(input);
    let mut output = String::with_capacity(escaped.len() + 64);
    let mut cursor = 0;
    for span in token_spans(&escaped) {
        if span.range.start < cursor {
            continue;
        }
        output.push_str(&escaped[cursor..span.range.start]);
        output.push_str(&format!(
            "<span class=\"{}\">{}</span>",
            span_class(&span, &escaped),
            span.text(&escaped)
        ));
        cursor = span.range.end;
    }
    output.push_str(&escaped[cursor..]);
    output
}
