//! # Response Parsing
//!
//! Recovers the lessons from a raw model response in two steps:
//! [`find_payload`] locates the text after the opening `<markdown>` marker, and
//! [`strip_block_quotes`] removes the `>` prefixes some models add to every line.

use crate::prompts::{CLOSING_DELIMITER, OPENING_DELIMITER};
use crate::types::ExtractedLessons;

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Returns everything after the first opening delimiter, or `None` if there is none.
pub fn find_payload(raw_response: &str) -> Option<&str> {
    let start = find_ignore_ascii_case(raw_response, OPENING_DELIMITER)?;
    Some(&raw_response[start + OPENING_DELIMITER.len()..])
}

/// Removes an optional block-quote prefix from the start of every line.
///
/// A prefix is leading whitespace, a single `>`, and any whitespace after it on the
/// same line. Lines without a `>` are returned untouched, indentation included.
/// Line endings (`\n` or `\r\n`) are kept as they are.
pub fn strip_block_quotes(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        match content.trim_start().strip_prefix('>') {
            Some(rest) => stripped.push_str(rest.trim_start()),
            None => stripped.push_str(content),
        }
        stripped.push_str(&line[content.len()..]);
    }
    stripped
}

/// Parses a raw model response into lessons.
///
/// The closing delimiter is optional; when present, it and anything after it are
/// dropped.
pub fn parse_response(raw_response: &str) -> Option<ExtractedLessons> {
    let payload = find_payload(raw_response)?;
    let (body, closing_delimiter_found) = match find_ignore_ascii_case(payload, CLOSING_DELIMITER)
    {
        Some(end) => (&payload[..end], true),
        None => (payload, false),
    };

    Some(ExtractedLessons {
        markdown: strip_block_quotes(body.trim()),
        closing_delimiter_found,
    })
}
