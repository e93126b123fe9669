//! # Extraction Orchestrator
//!
//! Drives a single run of the pipeline:
//!
//! ```text
//! Idle -> Extracting -> Assembling -> CallingRemote -> Parsing -> Succeeded
//!              \______________\______________\____________\----> Failed(kind)
//! ```
//!
//! `Succeeded` and `Failed` are terminal. A new call to `run` starts again from `Idle`.

use crate::{
    errors::{FailureKind, OrchestratorError},
    extract::{extract, ExtractionCache},
    parse::parse_response,
    prompts::PromptTemplate,
    providers::ai::AiProvider,
    types::{ExtractedLessons, UploadedDocument},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The stage a run is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Extracting,
    Assembling,
    CallingRemote,
    Parsing,
    Succeeded,
    Failed(FailureKind),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed(_))
    }
}

/// Runs extract → assemble → generate → parse against one AI provider.
#[derive(Debug)]
pub struct ExtractionOrchestrator<'a> {
    provider: &'a dyn AiProvider,
    state: RunState,
    transitions: Vec<RunState>,
}

impl<'a> ExtractionOrchestrator<'a> {
    pub fn new(provider: &'a dyn AiProvider) -> Self {
        Self {
            provider,
            state: RunState::Idle,
            transitions: vec![RunState::Idle],
        }
    }

    /// The current state; terminal once a run has returned.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state the last run passed through, starting with `Idle`.
    pub fn transitions(&self) -> &[RunState] {
        &self.transitions
    }

    /// Runs the full pipeline for `document`.
    pub async fn run(
        &mut self,
        document: &UploadedDocument,
        template: &PromptTemplate,
        credential: &str,
    ) -> Result<ExtractedLessons, OrchestratorError> {
        self.run_inner(document, template, credential, None).await
    }

    /// Like [`run`](Self::run), but reuses text already extracted into `cache`.
    pub async fn run_cached(
        &mut self,
        document: &UploadedDocument,
        template: &PromptTemplate,
        credential: &str,
        cache: &mut ExtractionCache,
    ) -> Result<ExtractedLessons, OrchestratorError> {
        self.run_inner(document, template, credential, Some(cache))
            .await
    }

    #[instrument(skip_all, fields(media_type = %document.media_type()))]
    async fn run_inner(
        &mut self,
        document: &UploadedDocument,
        template: &PromptTemplate,
        credential: &str,
        cache: Option<&mut ExtractionCache>,
    ) -> Result<ExtractedLessons, OrchestratorError> {
        self.state = RunState::Idle;
        self.transitions = vec![RunState::Idle];

        let result = self.drive(document, template, credential, cache).await;
        match &result {
            Ok(_) => {
                self.enter(RunState::Succeeded);
                info!("Key lessons extracted.");
            }
            Err(e) => {
                self.enter(RunState::Failed(e.kind()));
                warn!("Lesson extraction failed: {e}");
            }
        }
        result
    }

    async fn drive(
        &mut self,
        document: &UploadedDocument,
        template: &PromptTemplate,
        credential: &str,
        cache: Option<&mut ExtractionCache>,
    ) -> Result<ExtractedLessons, OrchestratorError> {
        self.enter(RunState::Extracting);
        let file_text: Arc<str> = match cache {
            Some(cache) => cache.get_or_extract(document)?,
            None => Arc::from(extract(document)?),
        };

        self.enter(RunState::Assembling);
        for warning in template.check() {
            warn!("Prompt template check: {warning}");
        }
        let prompt = template.assemble(&file_text);

        self.enter(RunState::CallingRemote);
        let provider = self.provider;
        let raw_response = provider.generate(&prompt, credential).await?;

        self.enter(RunState::Parsing);
        let lessons = parse_response(&raw_response).ok_or(OrchestratorError::Parse)?;
        if !lessons.closing_delimiter_found {
            warn!("Model response has no closing </markdown> marker; using the rest of the response.");
        }
        Ok(lessons)
    }

    fn enter(&mut self, state: RunState) {
        self.state = state;
        self.transitions.push(state);
    }
}
