//! # Prompt Assembly Tests
//!
//! Validates placeholder substitution and the template pre-flight check.

use keylessons::prompts::{
    assemble_prompt, lessons::DEFAULT_LESSONS_PROMPT, PromptTemplate, TemplateWarning,
    FILE_TEXT_PLACEHOLDER,
};

#[test]
fn test_assemble_simple_template() {
    assert_eq!(assemble_prompt("Text: {file_text}", "abc"), "Text: abc");
}

#[test]
fn test_assemble_removes_the_placeholder() {
    let template = PromptTemplate::new("Before\n{file_text}\nAfter");
    let prompt = template.assemble("Chapter 1. It was a dark night.");
    assert!(!prompt.contains(FILE_TEXT_PLACEHOLDER));
    assert_eq!(prompt, "Before\nChapter 1. It was a dark night.\nAfter");
}

/// Placeholder tokens inside the document text are inserted verbatim, not expanded.
#[test]
fn test_assemble_is_not_recursive() {
    let prompt = assemble_prompt("<doc>{file_text}</doc>", "literal {file_text} in a book");
    assert_eq!(prompt, "<doc>literal {file_text} in a book</doc>");
}

/// Only the first placeholder in the template is replaced.
#[test]
fn test_assemble_replaces_first_occurrence_only() {
    let prompt = assemble_prompt("{file_text} and {file_text}", "x");
    assert_eq!(prompt, "x and {file_text}");
}

#[test]
fn test_assemble_without_placeholder_returns_template() {
    assert_eq!(assemble_prompt("Summarize.", "ignored"), "Summarize.");
}

#[test]
fn test_default_template_passes_check() {
    let template = PromptTemplate::default();
    assert_eq!(template.as_str(), DEFAULT_LESSONS_PROMPT);
    assert!(template.check().is_empty());
    assert_eq!(DEFAULT_LESSONS_PROMPT.matches(FILE_TEXT_PLACEHOLDER).count(), 1);
}

#[test]
fn test_check_reports_every_missing_piece() {
    let template = PromptTemplate::new("Summarize the text.");
    assert_eq!(
        template.check(),
        vec![
            TemplateWarning::MissingPlaceholder,
            TemplateWarning::MissingOpeningDelimiter,
            TemplateWarning::MissingClosingDelimiter,
        ]
    );
}

#[test]
fn test_check_delimiters_case_insensitively() {
    let template = PromptTemplate::new("Wrap in <MARKDOWN></MARKDOWN>: {file_text}");
    assert!(template.check().is_empty());
}

#[test]
fn test_check_missing_closing_delimiter_only() {
    let template = PromptTemplate::new("Start your answer with <markdown>. {file_text}");
    assert_eq!(
        template.check(),
        vec![TemplateWarning::MissingClosingDelimiter]
    );
}
