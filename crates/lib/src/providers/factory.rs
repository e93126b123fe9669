//! # AI Provider Factory
//!
//! Creates the provider for a model name. Models whose name starts with `gemini`
//! go to the Gemini API; anything else is sent to an OpenAI-compatible endpoint,
//! which must be given explicitly.

use crate::{
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
};
use tracing::info;

/// The model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Settings needed to build a provider. The credential is not part of them; it is
/// passed with every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub model: String,
    /// Overrides the endpoint. Required for non-Gemini models.
    pub api_url: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_url: None,
        }
    }
}

/// The public `generateContent` endpoint for a Gemini model.
pub fn gemini_api_url(model: &str) -> String {
    format!("https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent")
}

/// Creates an AI provider instance from `settings`.
pub fn create_provider(settings: &ProviderSettings) -> Result<Box<dyn AiProvider>, PromptError> {
    let model = settings.model.trim();
    if model.is_empty() {
        return Err(PromptError::MissingAiProvider(
            "a model name must be set (AI_MODEL)".to_string(),
        ));
    }

    let provider: Box<dyn AiProvider> = if model.starts_with("gemini") {
        let api_url = settings
            .api_url
            .clone()
            .unwrap_or_else(|| gemini_api_url(model));
        info!("Configuring Gemini provider with URL: {}", api_url);
        Box::new(GeminiProvider::new(api_url)?)
    } else {
        let api_url = settings.api_url.clone().ok_or_else(|| {
            PromptError::MissingAiProvider(format!(
                "model '{model}' is not a Gemini model, so an API URL must be set (AI_API_URL)"
            ))
        })?;
        info!("Configuring local AI provider with URL: {}", api_url);
        Box::new(LocalAiProvider::new(api_url, Some(model.to_string()))?)
    };

    Ok(provider)
}
