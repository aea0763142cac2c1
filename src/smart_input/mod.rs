//! Smart task input
//!
//! Turns one free-form line of task text such as
//! `Fix reverb tail @mixing !high due:tomorrow` into a [`ParsedTaskDraft`]
//! and renders the same text with the recognised tokens highlighted.
//!
//! Recognised tokens (ASCII case-insensitive, anywhere in the text, bounded
//! by ASCII word boundaries):
//! - `@<section>`: section tag (`@mixing`)
//! - `!<level>`: priority (`!urgent`)
//! - `p1`..`p4`: priority shortcut, `p1` is urgent and `p4` is low
//! - `due:<today|tomorrow|YYYY-MM-DD>`: due date
//! - bare `today` / `tomorrow`: due date
//!
//! Each token kind is extracted by its own pass over the untouched input and
//! the last match of a pass wins. Passes run in a fixed order (sections,
//! priorities, shortcuts, `due:` tags, bare date words) and a later pass that
//! matched overwrites the field set by an earlier one, whatever the textual
//! order. So `p1 !low` is urgent and `today due:2025-03-01` is due today.
//!
//! Nothing here fails: text that does not form a token stays in the title.

mod highlight;
mod keywords;

pub use highlight::{escape_html, highlight};
pub use keywords::{KeywordClassifier, LayeredClassifier, SectionClassifier, TagClassifier};

use crate::sessions::{Priority, Section, local_date_today};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static SECTION_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)@(idea|writing|recording|production|mixing|mastering|release)\b")
        .expect("valid section tag regex")
});
static PRIORITY_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)!(low|medium|high|urgent)\b").expect("valid priority regex"));
static PRIORITY_SHORTCUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)\bp([1-4])\b").expect("valid priority shortcut regex"));
static DUE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)\bdue:(today|tomorrow|[0-9]{4}-[0-9]{2}-[0-9]{2})\b")
        .expect("valid due tag regex")
});
static DATE_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)\b(today|tomorrow)\b").expect("valid date word regex"));
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));
static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Structured result of annotating task text
///
/// Ephemeral: it becomes a task only once the caller supplies a song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTaskDraft {
    /// Text left after removing every token, whitespace collapsed and trimmed.
    /// Empty when the input was nothing but tokens; callers must reject that.
    pub title: String,
    /// `None` means the caller applies its default section
    pub section: Option<Section>,
    pub priority: Option<Priority>,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
}

impl ParsedTaskDraft {
    /// Whether any control token set a field
    pub fn is_tagged(&self) -> bool {
        self.section.is_some() || self.priority.is_some() || self.due_date.is_some()
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Kind of a recognised token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `@mixing`
    Section,
    /// `!high`
    Priority,
    /// `p2`
    PriorityShortcut,
    /// `due:tomorrow`
    DueTag,
    /// bare `today` or `tomorrow`
    DateWord,
}

/// Byte range of one recognised token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

impl TokenSpan {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range.clone()]
    }

    /// Priority level a priority token resolves to
    pub fn priority(&self, input: &str) -> Option<Priority> {
        let text = self.text(input);
        match self.kind {
            TokenKind::Priority => text.get(1..)?.parse().ok(),
            TokenKind::PriorityShortcut => Priority::from_shortcut(text.get(1..)?),
            _ => None,
        }
    }
}

/// Spans and winning value of one extraction pass
struct Extraction<T> {
    spans: Vec<Range<usize>>,
    value: Option<T>,
}

fn extract<T>(re: &Regex, input: &str, resolve: impl Fn(&str) -> Option<T>) -> Extraction<T> {
    let mut spans = Vec::new();
    let mut value = None;
    for caps in re.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        // a span without a value never removes text; last match wins
        if let Some(found) = caps.get(1).and_then(|m| resolve(m.as_str())) {
            spans.push(whole.range());
            value = Some(found);
        }
    }
    Extraction { spans, value }
}

/// Annotate task text, resolving `today`/`tomorrow` against the local date
pub fn annotate(input: &str) -> ParsedTaskDraft {
    annotate_on(input, local_date_today())
}

/// Annotate task text, resolving `today`/`tomorrow` against `today`
pub fn annotate_on(input: &str, today: NaiveDate) -> ParsedTaskDraft {
    let sections = extract(&SECTION_TAG_RE, input, |s| s.parse::<Section>().ok());
    let priorities = extract(&PRIORITY_TAG_RE, input, |s| s.parse::<Priority>().ok());
    let shortcuts = extract(&PRIORITY_SHORTCUT_RE, input, Priority::from_shortcut);
    let due_tags = extract(&DUE_TAG_RE, input, |s| resolve_due_date(s, today));
    let date_words = extract(&DATE_WORD_RE, input, |s| resolve_due_date(s, today));

    // later passes overwrite earlier ones
    let priority = shortcuts.value.or(priorities.value);
    let due_date = date_words.value.or(due_tags.value);

    let spans: Vec<Range<usize>> = [
        sections.spans,
        priorities.spans,
        shortcuts.spans,
        due_tags.spans,
        date_words.spans,
    ]
    .concat();

    ParsedTaskDraft {
        title: strip_tokens(input, spans),
        section: sections.value,
        priority,
        due_date,
    }
}

/// Resolve the argument of a date token
///
/// `today` and `tomorrow` are relative to `today`; a literal `YYYY-MM-DD`
/// is returned unchanged without calendar validation; anything else is `None`.
pub fn resolve_due_date(keyword: &str, today: NaiveDate) -> Option<String> {
    match keyword.to_lowercase().as_str() {
        "today" => Some(format_date(today)),
        "tomorrow" => today.succ_opt().map(format_date),
        _ if ISO_DATE_RE.is_match(keyword) => Some(keyword.to_string()),
        _ => None,
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Section named by the last `@section` tag, if any
pub fn section_tag(input: &str) -> Option<Section> {
    extract(&SECTION_TAG_RE, input, |s| s.parse::<Section>().ok()).value
}

/// Every token in `input`, ordered by start; outer spans come before the
/// spans they contain (`due:today` before its `today`)
pub fn token_spans(input: &str) -> Vec<TokenSpan> {
    let passes: [(&Regex, TokenKind); 5] = [
        (&*SECTION_TAG_RE, TokenKind::Section),
        (&*PRIORITY_TAG_RE, TokenKind::Priority),
        (&*PRIORITY_SHORTCUT_RE, TokenKind::PriorityShortcut),
        (&*DUE_TAG_RE, TokenKind::DueTag),
        (&*DATE_WORD_RE, TokenKind::DateWord),
    ];

    let mut spans: Vec<TokenSpan> = passes
        .iter()
        .flat_map(|(re, kind)| {
            re.find_iter(input).map(move |m| TokenSpan {
                kind: *kind,
                range: m.range(),
            })
        })
        .collect();
    spans.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(b.range.end.cmp(&a.range.end))
    });
    spans
}

/// Remove `spans` from `input`, then keep removing tokens from the residue
/// until none is left, and collapse whitespace
fn strip_tokens(input: &str, spans: Vec<Range<usize>>) -> String {
    let mut residue = remove_spans(input, spans);
    loop {
        let leftover: Vec<Range<usize>> = token_spans(&residue)
            .into_iter()
            .map(|span| span.range)
            .collect();
        if leftover.is_empty() {
            break;
        }
        residue = remove_spans(&residue, leftover);
    }
    WHITESPACE_RUN_RE
        .replace_all(&residue, " ")
        .trim()
        .to_string()
}

fn remove_spans(input: &str, mut spans: Vec<Range<usize>>) -> String {
    spans.sort_by_key(|range| range.start);
    let mut kept = String::with_capacity(input.len());
    let mut cursor = 0;
    for range in spans {
        if range.start > cursor {
            kept.push_str(&input[cursor..range.start]);
        }
        cursor = cursor.max(range.end);
    }
    kept.push_str(&input[cursor.min(input.len())..]);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_annotate_full_line() {
        let draft = annotate_on("Fix reverb tail @mixing !high due:tomorrow", day(2025, 2, 28));
        assert_eq!(draft.title, "Fix reverb tail");
        assert_eq!(draft.section, Some(Section::Mixing));
        assert_eq!(draft.priority, Some(Priority::High));
        assert_eq!(draft.due_date.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let draft = annotate_on("write the second verse", day(2025, 1, 1));
        assert_eq!(draft.title, "write the second verse");
        assert!(!draft.is_tagged());
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let draft = annotate_on("@Idea !URGENT P2 Due:Today hum it", day(2025, 6, 1));
        assert_eq!(draft.section, Some(Section::Idea));
        // shortcut pass runs after the explicit pass
        assert_eq!(draft.priority, Some(Priority::High));
        assert_eq!(draft.due_date.as_deref(), Some("2025-06-01"));
        assert_eq!(draft.title, "hum it");
    }

    #[test]
    fn test_section_needs_word_boundary() {
        let draft = annotate_on("@ideas and @unknown-section", day(2025, 1, 1));
        assert_eq!(draft.section, None);
        assert_eq!(draft.title, "@ideas and @unknown-section");
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        // U+017F folds to `s` only under Unicode rules
        let draft = annotate_on("send @ma\u{17f}tering files", day(2025, 1, 1));
        assert_eq!(draft.section, None);
        assert_eq!(draft.title, "send @ma\u{17f}tering files");
        assert!(token_spans("send @ma\u{17f}tering files").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_word_boundaries() {
        let draft = annotate_on("\u{e9}p1 caf\u{e9} today", day(2025, 1, 1));
        assert_eq!(draft.priority, Some(Priority::Urgent));
        assert_eq!(draft.due_date.as_deref(), Some("2025-01-01"));
        assert_eq!(draft.title, "\u{e9} caf\u{e9}");
    }

    #[test]
    fn test_date_word_pass_overrides_due_tag() {
        let draft = annotate_on("today call mastering engineer due:2025-03-01", day(2025, 1, 10));
        assert_eq!(draft.due_date.as_deref(), Some("2025-01-10"));
        assert_eq!(draft.title, "call mastering engineer");
    }

    #[test]
    fn test_literal_date_is_not_validated() {
        let draft = annotate_on("due:2025-13-45 weird", day(2025, 1, 1));
        assert_eq!(draft.due_date.as_deref(), Some("2025-13-45"));
        assert_eq!(draft.title, "weird");
    }

    #[test]
    fn test_malformed_due_tag_stays_in_title() {
        let draft = annotate_on("due:notaday send stems", day(2025, 1, 1));
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.title, "due:notaday send stems");
    }

    #[test]
    fn test_tomorrow_rolls_over_month_and_year() {
        assert_eq!(
            resolve_due_date("tomorrow", day(2024, 12, 31)).as_deref(),
            Some("2025-01-01")
        );
        assert_eq!(
            resolve_due_date("TOMORROW", day(2024, 2, 28)).as_deref(),
            Some("2024-02-29")
        );
        assert_eq!(resolve_due_date("yesterday", day(2024, 2, 28)), None);
        assert_eq!(resolve_due_date("2025-3-1", day(2024, 2, 28)), None);
    }

    #[test]
    fn test_spliced_token_is_removed_from_title() {
        let draft = annotate_on("due@idea:2025-03-01 bounce", day(2025, 1, 1));
        assert_eq!(draft.section, Some(Section::Idea));
        // the date only appears once @idea is gone, so it sets no field
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.title, "bounce");
    }

    #[test]
    fn test_single_newline_survives_collapse() {
        let draft = annotate_on("line one\nline two", day(2025, 1, 1));
        assert_eq!(draft.title, "line one\nline two");

        let draft = annotate_on("line one @mixing\n\nline two", day(2025, 1, 1));
        assert_eq!(draft.title, "line one line two");
    }

    #[test]
    fn test_token_spans_order_outer_first() {
        let input = "due:today p3";
        let spans = token_spans(input);
        let kinds: Vec<TokenKind> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::DueTag,
                TokenKind::DateWord,
                TokenKind::PriorityShortcut
            ]
        );
        assert_eq!(spans[0].text(input), "due:today");
        assert_eq!(spans[2].priority(input), Some(Priority::Medium));
    }

    #[test]
    fn test_section_tag_helper() {
        assert_eq!(section_tag("@writing then @release"), Some(Section::Release));
        assert_eq!(section_tag("no tags"), None);
    }
}
