//! # Session Context
//!
//! Everything one user works with between actions: the current upload, the saved
//! prompt template, the API credential and the last extracted lessons. Nothing here
//! is shared across sessions.

use crate::{
    errors::{ExtractionError, OrchestratorError},
    extract::ExtractionCache,
    orchestrator::ExtractionOrchestrator,
    prompts::{PromptTemplate, TemplateWarning},
    providers::ai::AiProvider,
    types::{ExtractedLessons, UploadedDocument},
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct Session {
    document: Option<UploadedDocument>,
    template: PromptTemplate,
    credential: String,
    cache: ExtractionCache,
    lessons: Option<ExtractedLessons>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current document. Lessons from the previous one are discarded.
    pub fn upload(&mut self, document: UploadedDocument) {
        info!(
            "Document uploaded ({} bytes, {}).",
            document.content().len(),
            document.media_type()
        );
        self.document = Some(document);
        self.lessons = None;
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Saves a new template and returns its pre-flight warnings.
    ///
    /// The template is saved even when warnings are reported.
    pub fn save_template(&mut self, template: PromptTemplate) -> Vec<TemplateWarning> {
        let warnings = template.check();
        self.template = template;
        warnings
    }

    pub fn reset_template(&mut self) {
        self.template = PromptTemplate::default();
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn set_credential(&mut self, credential: impl Into<String>) {
        self.credential = credential.into();
    }

    /// The full text of the current document, or `None` when nothing is uploaded.
    pub fn extracted_text(&mut self) -> Result<Option<Arc<str>>, ExtractionError> {
        match &self.document {
            Some(document) => self.cache.get_or_extract(document).map(Some),
            None => Ok(None),
        }
    }

    /// The lessons from the last successful run on the current document.
    pub fn lessons(&self) -> Option<&ExtractedLessons> {
        self.lessons.as_ref()
    }

    /// Runs the pipeline on the current document with the saved template and
    /// credential.
    pub async fn extract_lessons(
        &mut self,
        provider: &dyn AiProvider,
    ) -> Result<&ExtractedLessons, OrchestratorError> {
        self.lessons = None;
        let document = self.document.as_ref().ok_or(OrchestratorError::NoDocument)?;

        let mut orchestrator = ExtractionOrchestrator::new(provider);
        let lessons = orchestrator
            .run_cached(document, &self.template, &self.credential, &mut self.cache)
            .await?;
        Ok(self.lessons.insert(lessons))
    }
}
