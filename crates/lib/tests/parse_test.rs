//! # Response Parsing Tests
//!
//! Validates delimiter detection and block-quote cleanup on raw model output.

use keylessons::parse::{find_payload, parse_response, strip_block_quotes};

#[test]
fn test_parse_simple_markdown_block() {
    let lessons = parse_response("<markdown>\nHello\n</markdown>").expect("payload expected");
    assert_eq!(lessons.markdown, "Hello");
    assert!(lessons.closing_delimiter_found);
}

#[test]
fn test_parse_without_markers_returns_none() {
    assert!(parse_response("no markers here").is_none());
    assert!(find_payload("no markers here").is_none());
}

#[test]
fn test_parse_is_case_insensitive_and_strips_block_quotes() {
    let lessons = parse_response("<MARKDOWN>\n> quoted line\nplain line\n</markdown>")
        .expect("payload expected");
    assert_eq!(lessons.markdown, "quoted line\nplain line");
}

/// The closing marker is optional: everything after the opening marker is kept.
#[test]
fn test_parse_accepts_missing_closing_marker() {
    let lessons = parse_response("Sure! <markdown>\n## Overview\nA book about habits.\n")
        .expect("payload expected");
    assert_eq!(lessons.markdown, "## Overview\nA book about habits.");
    assert!(!lessons.closing_delimiter_found);
}

#[test]
fn test_parse_drops_content_after_closing_marker() {
    let raw = "Here you go:\n<markdown>\n- Lesson one\n</Markdown>\nLet me know if you need more!";
    let lessons = parse_response(raw).expect("payload expected");
    assert_eq!(lessons.markdown, "- Lesson one");
}

#[test]
fn test_parse_clean_payload_is_trimmed_self() {
    let clean = "  \n# Overview\n\n- Topic 1: Brief description\n  - Detail\n\n";
    let lessons = parse_response(&format!("<markdown>{clean}")).expect("payload expected");
    assert_eq!(lessons.markdown, clean.trim());
}

#[test]
fn test_parse_empty_payload_is_present_but_empty() {
    let lessons = parse_response("<markdown></markdown>").expect("payload expected");
    assert_eq!(lessons.markdown, "");
}

#[test]
fn test_find_payload_returns_text_after_first_marker() {
    assert_eq!(find_payload("intro <markdown>body"), Some("body"));
    assert_eq!(
        find_payload("<markdown>a<markdown>b"),
        Some("a<markdown>b")
    );
}

#[test]
fn test_strip_block_quotes_handles_indented_markers() {
    let text = "   >   indented quote\n>tight quote\nplain";
    assert_eq!(
        strip_block_quotes(text),
        "indented quote\ntight quote\nplain"
    );
}

/// Only one quote level is removed and unquoted indentation survives.
#[test]
fn test_strip_block_quotes_preserves_nested_lists() {
    let text = "- Topic\n  - Sub topic\n>> nested quote";
    assert_eq!(
        strip_block_quotes(text),
        "- Topic\n  - Sub topic\n> nested quote"
    );
}

#[test]
fn test_strip_block_quotes_keeps_line_endings() {
    assert_eq!(strip_block_quotes("> a\r\n> b\r\n"), "a\r\nb\r\n");
    assert_eq!(strip_block_quotes("> a\nplain\r\n>\n"), "a\nplain\r\n\n");
}
