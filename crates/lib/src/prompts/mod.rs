//! # Prompt Templates
//!
//! A prompt template is free text containing one [`FILE_TEXT_PLACEHOLDER`] token
//! where the document text is injected, plus instructions telling the model to wrap
//! its answer in [`OPENING_DELIMITER`] and [`CLOSING_DELIMITER`].

pub mod lessons;

use std::fmt;

/// Marks where the extracted document text is inserted.
pub const FILE_TEXT_PLACEHOLDER: &str = "{file_text}";
/// The tag the model is told to open its answer with.
pub const OPENING_DELIMITER: &str = "<markdown>";
/// The tag the model is told to close its answer with.
pub const CLOSING_DELIMITER: &str = "</markdown>";

/// Substitutes the first placeholder in `template` with `file_text`.
///
/// The text is inserted verbatim. Placeholder tokens inside `file_text` are not
/// expanded again.
pub fn assemble_prompt(template: &str, file_text: &str) -> String {
    template.replacen(FILE_TEXT_PLACEHOLDER, file_text, 1)
}

/// A problem found by [`PromptTemplate::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateWarning {
    /// The document text would never reach the model.
    MissingPlaceholder,
    /// The model is never told to open its answer with `<markdown>`.
    MissingOpeningDelimiter,
    /// The model is never told to close its answer with `</markdown>`.
    MissingClosingDelimiter,
}

impl fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateWarning::MissingPlaceholder => write!(
                f,
                "the prompt does not contain {FILE_TEXT_PLACEHOLDER}; the document text will not be sent"
            ),
            TemplateWarning::MissingOpeningDelimiter => write!(
                f,
                "the prompt does not mention {OPENING_DELIMITER}; the response will not be parseable"
            ),
            TemplateWarning::MissingClosingDelimiter => write!(
                f,
                "the prompt does not mention {CLOSING_DELIMITER}; ask the model to close its answer"
            ),
        }
    }
}

/// A user-editable prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the final prompt for `file_text`.
    pub fn assemble(&self, file_text: &str) -> String {
        assemble_prompt(&self.0, file_text)
    }

    /// Pre-flight check for the pieces the rest of the pipeline relies on.
    ///
    /// The delimiter checks are case-insensitive, matching how responses are parsed.
    pub fn check(&self) -> Vec<TemplateWarning> {
        let lowered = self.0.to_ascii_lowercase();
        let mut warnings = Vec::new();
        if !self.0.contains(FILE_TEXT_PLACEHOLDER) {
            warnings.push(TemplateWarning::MissingPlaceholder);
        }
        if !lowered.contains(OPENING_DELIMITER) {
            warnings.push(TemplateWarning::MissingOpeningDelimiter);
        }
        if !lowered.contains(CLOSING_DELIMITER) {
            warnings.push(TemplateWarning::MissingClosingDelimiter);
        }
        warnings
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(lessons::DEFAULT_LESSONS_PROMPT)
    }
}

impl From<String> for PromptTemplate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PromptTemplate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
