use thiserror::Error;

/// Errors raised by AI providers while generating a response.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider response contained no text")]
    EmptyResponse,
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
}

/// Errors raised while turning document bytes into plain text.
///
/// Extraction never yields partial text: any of these means the whole document
/// is considered unreadable.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to parse PDF content: {0}")]
    Pdf(String),
    #[error("Failed to parse EPUB package: {0}")]
    Epub(String),
    #[error("Document is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),
    #[error("I/O error while reading the document: {0}")]
    Io(#[from] std::io::Error),
}

/// The category of a failed extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoDocument,
    Extraction,
    ModelCall,
    Parse,
}

/// Errors surfaced by a full extraction run.
///
/// `ModelCall` and `Parse` are kept apart so callers can tell an unreachable
/// model from a model that answered in an unexpected shape.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("No document has been uploaded")]
    NoDocument,
    #[error("Text extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Model call failed: {0}")]
    ModelCall(#[from] PromptError),
    #[error("The model response did not contain a <markdown> section")]
    Parse,
}

impl OrchestratorError {
    pub fn kind(&self) -> FailureKind {
        match self {
            OrchestratorError::NoDocument => FailureKind::NoDocument,
            OrchestratorError::Extraction(_) => FailureKind::Extraction,
            OrchestratorError::ModelCall(_) => FailureKind::ModelCall,
            OrchestratorError::Parse => FailureKind::Parse,
        }
    }
}
