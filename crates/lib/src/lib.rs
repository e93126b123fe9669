//! # keylessons
//!
//! This crate turns an uploaded document (PDF, EPUB, or plain text) into a prompt for a
//! large-language model and parses the model's `<markdown>` answer into a list of key
//! lessons. The pipeline is:
//!
//! 1.  **Extraction** ([`extract`]): type-dispatched text extraction from raw bytes.
//! 2.  **Assembly** ([`prompts`]): substitution of the text into a prompt template.
//! 3.  **Generation** ([`providers::ai`]): a single call to a remote AI provider.
//! 4.  **Parsing** ([`parse`]): recovery of the delimited markdown payload.
//!
//! [`orchestrator::ExtractionOrchestrator`] drives one run of the pipeline and
//! [`session::Session`] holds the per-user state between runs.

pub mod errors;
pub mod extract;
pub mod orchestrator;
pub mod parse;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod types;

pub use errors::{ExtractionError, FailureKind, OrchestratorError, PromptError};
pub use extract::{extract, extract_text, ExtractionCache};
pub use orchestrator::{ExtractionOrchestrator, RunState};
pub use parse::parse_response;
pub use prompts::{PromptTemplate, TemplateWarning};
pub use session::Session;
pub use types::{ExtractedLessons, MediaType, UploadedDocument};
