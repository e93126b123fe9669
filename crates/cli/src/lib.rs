//! # `keylessons` CLI Library Crate
//!
//! Argument definitions and command handlers for the `keylessons` binary.

pub mod session_repl;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use keylessons::{
    extract,
    prompts::PromptTemplate,
    providers::factory::{create_provider, ProviderSettings, DEFAULT_GEMINI_MODEL},
    ExtractionOrchestrator, MediaType, Session, UploadedDocument,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the key lessons of a PDF, EPUB or text file
    Extract(ExtractArgs),
    /// Print the text extracted from a document
    Text(TextArgs),
    /// Print the default prompt, or check a prompt template file
    Prompt(PromptArgs),
    /// Start an interactive session
    Session(SessionArgs),
}

/// The document to work on.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Path to the document.
    pub file: PathBuf,
    /// Declared MIME type (e.g. "application/pdf"). Inferred from the extension if omitted.
    #[arg(long)]
    pub media_type: Option<String>,
}

impl DocumentArgs {
    pub fn load(&self) -> Result<UploadedDocument> {
        let declared = self.media_type.as_deref().map(MediaType::from_mime);
        UploadedDocument::read_from(&self.file, declared)
            .with_context(|| format!("Failed to read '{}'", self.file.display()))
    }
}

/// AI provider configuration.
#[derive(Args, Debug)]
pub struct ProviderArgs {
    /// The API key sent with every model call.
    #[arg(long, env = "AI_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,
    /// The model to call. Names starting with "gemini" use the Gemini API.
    #[arg(long, env = "AI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,
    /// Overrides the model endpoint. Required for non-Gemini models.
    #[arg(long, env = "AI_API_URL")]
    pub api_url: Option<String>,
}

impl ProviderArgs {
    pub fn settings(&self) -> ProviderSettings {
        ProviderSettings {
            model: self.model.clone(),
            api_url: self.api_url.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
    #[command(flatten)]
    pub provider: ProviderArgs,
    /// A prompt template file to use instead of the default prompt.
    #[arg(long)]
    pub prompt: Option<PathBuf>,
    /// Write the lessons to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TextArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// A prompt template file to check for the placeholder and delimiters.
    #[arg(long)]
    pub check: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,
}

// --- Public Entrypoint ---

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => handle_extract(args).await,
        Commands::Text(args) => handle_text(args),
        Commands::Prompt(args) => handle_prompt(args),
        Commands::Session(args) => handle_session(args).await,
    }
}

// --- Command Handlers ---

fn load_template(path: &Path) -> Result<PromptTemplate> {
    let template = fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompt template '{}'", path.display()))?;
    Ok(PromptTemplate::new(template))
}

async fn handle_extract(args: ExtractArgs) -> Result<()> {
    let document = args.document.load()?;
    let template = match &args.prompt {
        Some(path) => load_template(path)?,
        None => PromptTemplate::default(),
    };
    let provider = create_provider(&args.provider.settings())?;

    eprintln!("Extracting key lessons...");
    let mut orchestrator = ExtractionOrchestrator::new(provider.as_ref());
    let lessons = match orchestrator
        .run(&document, &template, &args.provider.api_key)
        .await
    {
        Ok(lessons) => lessons,
        Err(e) => {
            eprintln!("Could not extract the lessons.");
            return Err(e.into());
        }
    };
    eprintln!("Key lessons extracted!");

    match &args.output {
        Some(path) => {
            fs::write(path, lessons.as_str())
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!("Lessons written to '{}'.", path.display());
        }
        None => println!("{lessons}"),
    }
    Ok(())
}

fn handle_text(args: TextArgs) -> Result<()> {
    let document = args.document.load()?;
    let text = extract(&document)?;
    println!("{text}");
    Ok(())
}

fn handle_prompt(args: PromptArgs) -> Result<()> {
    let Some(path) = &args.check else {
        println!("{}", PromptTemplate::default().as_str());
        return Ok(());
    };

    let warnings = load_template(path)?.check();
    if warnings.is_empty() {
        println!("Prompt template OK.");
    }
    for warning in warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

async fn handle_session(args: SessionArgs) -> Result<()> {
    let provider = create_provider(&args.provider.settings())?;
    let mut session = Session::new();
    session.set_credential(args.provider.api_key.as_str());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    session_repl::run_session(stdin.lock(), stdout.lock(), provider.as_ref(), &mut session).await
}
