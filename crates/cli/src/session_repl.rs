//! # Interactive Session
//!
//! A line-oriented loop over one [`Session`]: upload a document, inspect its text,
//! edit the prompt, set the credential and run the extraction, in any order.

use anyhow::Result;
use keylessons::{
    providers::ai::AiProvider, MediaType, OrchestratorError, PromptTemplate, Session,
    UploadedDocument,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  upload <path> [--mime <type>]
                         load a document (type inferred from the extension if no MIME is given)
  text                   print the extracted text of the current document
  prompt show            print the current prompt template
  prompt load <path>     replace the prompt template with the contents of a file
  prompt reset           restore the default prompt template
  key <credential>       set the API key used for model calls
  extract                extract the key lessons of the current document
  help                   show this message
  quit                   leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Upload { path: PathBuf, mime: Option<String> },
    Text,
    PromptShow,
    PromptLoad(PathBuf),
    PromptReset,
    Key(String),
    Extract,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim_start()))
            .unwrap_or((line, ""));

        match (command, rest) {
            ("upload", "") => Err("usage: upload <path> [--mime <type>]".to_string()),
            ("upload", rest) => Ok(parse_upload(rest)),
            ("text", "") => Ok(ReplCommand::Text),
            ("prompt", "" | "show") => Ok(ReplCommand::PromptShow),
            ("prompt", "reset") => Ok(ReplCommand::PromptReset),
            ("prompt", rest) => match rest.strip_prefix("load") {
                Some(path) if path.starts_with(char::is_whitespace) => {
                    Ok(ReplCommand::PromptLoad(PathBuf::from(path.trim_start())))
                }
                _ => Err("usage: prompt show | prompt load <path> | prompt reset".to_string()),
            },
            ("key", credential)
                if !credential.is_empty() && !credential.contains(char::is_whitespace) =>
            {
                Ok(ReplCommand::Key(credential.to_string()))
            }
            ("key", _) => Err("usage: key <credential>".to_string()),
            ("extract", "") => Ok(ReplCommand::Extract),
            ("help", _) => Ok(ReplCommand::Help),
            ("quit" | "exit", _) => Ok(ReplCommand::Quit),
            (other, _) => Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
        }
    }
}

/// The path is the rest of the line, so it may contain spaces. A trailing
/// `--mime <type>` declares the media type.
fn parse_upload(rest: &str) -> ReplCommand {
    match rest.rsplit_once(" --mime ") {
        Some((path, mime)) if !path.trim().is_empty() && !mime.trim().is_empty() => {
            ReplCommand::Upload {
                path: PathBuf::from(path.trim_end()),
                mime: Some(mime.trim().to_string()),
            }
        }
        _ => ReplCommand::Upload {
            path: PathBuf::from(rest),
            mime: None,
        },
    }
}

/// Reads commands from `input` until `quit` or end of input, writing all feedback to
/// `output`. Failures of individual commands are reported and the loop continues.
pub async fn run_session<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    provider: &dyn AiProvider,
    session: &mut Session,
) -> Result<()> {
    writeln!(output, "Type 'help' for a list of commands.")?;
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ReplCommand>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(output, "{message}")?;
                continue;
            }
        };
        if command == ReplCommand::Quit {
            break;
        }
        execute(command, &mut output, provider, session).await?;
    }
    Ok(())
}

async fn execute<W: Write>(
    command: ReplCommand,
    output: &mut W,
    provider: &dyn AiProvider,
    session: &mut Session,
) -> Result<()> {
    match command {
        ReplCommand::Upload { path, mime } => {
            let declared = mime.as_deref().map(MediaType::from_mime);
            match UploadedDocument::read_from(&path, declared) {
                Ok(document) => {
                    writeln!(
                        output,
                        "Uploaded '{}' ({}, {} bytes).",
                        path.display(),
                        document.media_type(),
                        document.content().len()
                    )?;
                    session.upload(document);
                }
                Err(e) => writeln!(output, "Could not read '{}': {e}", path.display())?,
            }
        }
        ReplCommand::Text => match session.extracted_text() {
            Ok(Some(text)) => writeln!(output, "{text}")?,
            Ok(None) => writeln!(output, "No document uploaded.")?,
            Err(e) => writeln!(output, "Could not extract the text: {e}")?,
        },
        ReplCommand::PromptShow => writeln!(output, "{}", session.template().as_str())?,
        ReplCommand::PromptLoad(path) => match std::fs::read_to_string(&path) {
            Ok(template) => {
                for warning in session.save_template(PromptTemplate::new(template)) {
                    writeln!(output, "warning: {warning}")?;
                }
                writeln!(output, "Prompt saved.")?;
            }
            Err(e) => writeln!(output, "Could not read '{}': {e}", path.display())?,
        },
        ReplCommand::PromptReset => {
            session.reset_template();
            writeln!(output, "Prompt reset to the default.")?;
        }
        ReplCommand::Key(credential) => {
            session.set_credential(credential);
            writeln!(output, "Credential saved.")?;
        }
        ReplCommand::Extract => {
            writeln!(output, "Extracting key lessons...")?;
            match session.extract_lessons(provider).await {
                Ok(lessons) => {
                    writeln!(output, "Key lessons extracted!")?;
                    writeln!(output, "{lessons}")?;
                }
                Err(OrchestratorError::NoDocument) => {
                    writeln!(output, "Upload a document first.")?
                }
                Err(e) => writeln!(output, "Could not extract the lessons. ({e})")?,
            }
        }
        ReplCommand::Help => writeln!(output, "{HELP}")?,
        ReplCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "upload book.pdf".parse::<ReplCommand>(),
            Ok(ReplCommand::Upload {
                path: PathBuf::from("book.pdf"),
                mime: None
            })
        );
        assert_eq!(
            "upload notes --mime application/pdf".parse::<ReplCommand>(),
            Ok(ReplCommand::Upload {
                path: PathBuf::from("notes"),
                mime: Some("application/pdf".to_string())
            })
        );
        assert_eq!("prompt".parse::<ReplCommand>(), Ok(ReplCommand::PromptShow));
        assert_eq!(
            "prompt load p.txt".parse::<ReplCommand>(),
            Ok(ReplCommand::PromptLoad(PathBuf::from("p.txt")))
        );
        assert_eq!("  key  abc  ".parse::<ReplCommand>(), Ok(ReplCommand::Key("abc".to_string())));
        assert_eq!("exit".parse::<ReplCommand>(), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_parse_upload_path_with_spaces() {
        assert_eq!(
            "upload My Books/The Art of War.epub\n".parse::<ReplCommand>(),
            Ok(ReplCommand::Upload {
                path: PathBuf::from("My Books/The Art of War.epub"),
                mime: None
            })
        );
        assert_eq!(
            "upload  notes from class  --mime text/plain".parse::<ReplCommand>(),
            Ok(ReplCommand::Upload {
                path: PathBuf::from("notes from class"),
                mime: Some("text/plain".to_string())
            })
        );
        assert_eq!(
            "prompt load my prompts/short.txt".parse::<ReplCommand>(),
            Ok(ReplCommand::PromptLoad(PathBuf::from("my prompts/short.txt")))
        );
    }

    #[test]
    fn test_parse_rejects_bad_usage() {
        assert!("upload".parse::<ReplCommand>().is_err());
        assert!("key".parse::<ReplCommand>().is_err());
        assert!("key two words".parse::<ReplCommand>().is_err());
        assert!("prompt load".parse::<ReplCommand>().is_err());
        assert!("prompt loader".parse::<ReplCommand>().is_err());
        assert!("prompt edit".parse::<ReplCommand>().is_err());
        assert!("dance".parse::<ReplCommand>().is_err());
    }
}
