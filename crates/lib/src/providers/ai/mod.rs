pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This is the only remote collaborator of the pipeline: one prompt in, one block of
/// text out. Implementations make a single round trip with no retry.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response for `prompt`.
    ///
    /// `api_key` is the user's credential, passed through untouched. An empty key is
    /// sent as-is and left for the provider to reject.
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
