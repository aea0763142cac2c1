//! Smart task input: annotation and highlighting
use chrono::{Days, NaiveDate};
use sessions_mcp::sessions::local_date_today;
use sessions_mcp::smart_input::{annotate, annotate_on, highlight, token_spans};
use sessions_mcp::{Priority, Section};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_annotate_is_pure() {
    let input = "Bounce stems @release p2 tomorrow";
    let today = day(2025, 5, 5);
    assert_eq!(annotate_on(input, today), annotate_on(input, today));
    assert_eq!(annotate(input).title, annotate(input).title);
}

#[test]
fn test_title_never_contains_tokens() {
    let inputs = [
        "Fix reverb tail @mixing !high due:tomorrow",
        "@idea    !urgent   write   hook",
        "today due:today p1 !low @writing",
        "due@idea:2025-03-01 bounce",
        "p@mixing1 weird splice",
        "!hi@releasegh still weird",
        "tomorrow@writing",
    ];
    for input in inputs {
        let draft = annotate_on(input, day(2025, 1, 1));
        assert!(
            token_spans(&draft.title).is_empty(),
            "title {:?} of {:?} still has tokens",
            draft.title,
            input
        );
    }
}

#[test]
fn test_last_section_tag_wins() {
    assert_eq!(
        annotate("@writing @mixing task").section,
        Some(Section::Mixing)
    );
}

#[test]
fn test_shortcut_pass_beats_explicit_priority() {
    assert_eq!(
        annotate("p1 !low fix vocals").priority,
        Some(Priority::Urgent)
    );
    assert_eq!(
        annotate("!low p1 fix vocals").priority,
        Some(Priority::Urgent)
    );
    // within one pass the last match wins
    assert_eq!(annotate("!low !high x").priority, Some(Priority::High));
    assert_eq!(annotate("p4 p2 x").priority, Some(Priority::High));
}

#[test]
fn test_due_tomorrow_is_local_today_plus_one() {
    let expected = local_date_today()
        .checked_add_days(Days::new(1))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string();
    assert_eq!(
        annotate("send mix due:tomorrow").due_date,
        Some(expected)
    );
}

#[test]
fn test_literal_due_date() {
    let draft = annotate("due:2025-03-01");
    assert_eq!(draft.due_date.as_deref(), Some("2025-03-01"));
    assert_eq!(draft.title, "");
}

#[test]
fn test_out_of_range_shortcut_is_text() {
    let draft = annotate("p9 is not a priority");
    assert_eq!(draft.title, "p9 is not a priority");
    assert_eq!(draft.priority, None);
}

#[test]
fn test_whitespace_collapses() {
    assert_eq!(annotate("@idea    !urgent   write   hook").title, "write hook");
}

#[test]
fn test_only_tokens_gives_empty_title() {
    let draft = annotate("@idea !urgent due:today");
    assert_eq!(draft.title, "");
    assert!(!draft.has_title());
    assert_eq!(draft.section, Some(Section::Idea));
    assert_eq!(draft.priority, Some(Priority::Urgent));
}

#[test]
fn test_reference_example() {
    let today = day(2025, 2, 28);
    let draft = annotate_on("Fix reverb tail @mixing !high due:tomorrow", today);
    assert_eq!(draft.title, "Fix reverb tail");
    assert_eq!(draft.section, Some(Section::Mixing));
    assert_eq!(draft.priority, Some(Priority::High));
    assert_eq!(draft.due_date.as_deref(), Some("2025-03-01"));
}

#[test]
fn test_unrecognised_tokens_pass_through() {
    let draft = annotate_on("p9 due:notaday @unknown-section keep", day(2025, 1, 1));
    assert_eq!(draft.title, "p9 due:notaday @unknown-section keep");
    assert!(!draft.is_tagged());
}

#[test]
fn test_highlight_escapes_markup() {
    let html = highlight("<script>alert(1)</script> @idea");
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("<span class=\"text-primary font-medium\">@idea</span>"));
}

#[test]
fn test_highlight_keeps_text_order() {
    let html = highlight("a p3 b tomorrow c");
    assert_eq!(
        html,
        "a <span class=\"text-blue-500 font-medium\">p3</span> b \
         <span class=\"text-emerald-500 font-medium\">tomorrow</span> c"
    );
}

#[test]
fn test_unicode_lookalikes_stay_in_title() {
    let draft = annotate("send @ma\u{17f}tering files");
    assert_eq!(draft.section, None);
    assert_eq!(draft.title, "send @ma\u{17f}tering files");
    assert_eq!(
        highlight("send @ma\u{17f}tering files"),
        "send @ma\u{17f}tering files"
    );

    let draft = annotate_on("\u{e9}p1 caf\u{e9} today", day(2025, 1, 1));
    assert_eq!(draft.priority, Some(Priority::Urgent));
}
