//! # EPUB Text Extraction
//!
//! An EPUB is a ZIP archive. `META-INF/container.xml` names the package document
//! (OPF), whose `<manifest>` lists every content item in package order. The text of
//! each XHTML item is appended in that order.

use crate::errors::ExtractionError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::{Html, Node};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use zip::ZipArchive;

const CONTAINER_PATH: &str = "META-INF/container.xml";
const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
const HTML_MEDIA_TYPE: &str = "text/html";

/// A single `<item>` from the package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

impl ManifestItem {
    fn is_html(&self) -> bool {
        matches!(self.media_type.as_str(), XHTML_MEDIA_TYPE | HTML_MEDIA_TYPE)
    }
}

/// Extracts the human-readable text of every XHTML document in an EPUB.
pub fn extract_text_from_epub(epub_data: &[u8]) -> Result<String, ExtractionError> {
    extract_text_from_epub_in(epub_data, &std::env::temp_dir())
}

/// Like [`extract_text_from_epub`], spooling the archive into `scratch_dir`.
///
/// The scratch file is removed when it goes out of scope, including on every
/// error path.
pub fn extract_text_from_epub_in(
    epub_data: &[u8],
    scratch_dir: &Path,
) -> Result<String, ExtractionError> {
    let mut scratch = NamedTempFile::new_in(scratch_dir)?;
    scratch.write_all(epub_data)?;
    scratch.flush()?;
    let file: File = scratch.reopen()?;

    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ExtractionError::Epub(format!("Not a valid EPUB archive: {e}")))?;

    let container = read_entry(&mut archive, CONTAINER_PATH)?;
    let package_path = parse_rootfile_path(&container)?;
    let package = read_entry(&mut archive, &package_path)?;
    let manifest = parse_manifest(&package)?;
    debug!(
        "EPUB package '{}' lists {} manifest items.",
        package_path,
        manifest.len()
    );

    let base_dir = package_path
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or("");

    let mut full_text = String::new();
    for item in manifest.iter().filter(|item| item.is_html()) {
        let entry_path = resolve_href(base_dir, &item.href);
        let markup = read_entry(&mut archive, &entry_path)?;
        let text = if item.media_type == XHTML_MEDIA_TYPE {
            xhtml_to_text(&markup).unwrap_or_else(|e| {
                debug!("'{entry_path}' is not well-formed XML ({e}); parsing it as HTML.");
                html_to_text(&String::from_utf8_lossy(&markup))
            })
        } else {
            html_to_text(&String::from_utf8_lossy(&markup))
        };
        full_text.push_str(&text);
    }
    Ok(full_text)
}

fn is_hidden_element(local_name: &[u8]) -> bool {
    matches!(local_name, b"script" | b"style")
}

/// Returns the text of an XHTML document parsed as XML, skipping `script` and
/// `style` content and anything outside the root element.
///
/// Self-closing elements such as `<script src="a.js"/>` or `<title/>` are empty, as
/// XML requires.
pub fn xhtml_to_text(markup: &[u8]) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_reader(markup);
    reader.config_mut().check_end_names = false;
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    let mut hidden = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                if is_hidden_element(e.local_name().as_ref()) {
                    hidden += 1;
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if is_hidden_element(e.local_name().as_ref()) {
                    hidden = hidden.saturating_sub(1);
                }
            }
            Event::Text(e) if depth > 0 && hidden == 0 => {
                let fragment = e
                    .unescape_with(|entity| match entity {
                        "nbsp" => Some("\u{a0}"),
                        _ => None,
                    })
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned().into());
                text.push_str(&fragment);
            }
            Event::CData(e) if depth > 0 && hidden == 0 => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

/// Returns the text nodes of an HTML document, skipping `script` and `style`.
pub fn html_to_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

/// Reads `full-path` from the first `<rootfile>` in `container.xml`.
fn parse_rootfile_path(container: &[u8]) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_reader(container);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"rootfile" =>
            {
                if let Some(path) = attribute(e, b"full-path") {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Epub(format!(
                    "Malformed {CONTAINER_PATH}: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Err(ExtractionError::Epub(format!(
        "{CONTAINER_PATH} does not name a package document"
    )))
}

/// Lists the manifest items of an OPF package document in document order.
pub fn parse_manifest(package: &[u8]) -> Result<Vec<ManifestItem>, ExtractionError> {
    let mut reader = Reader::from_reader(package);
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"item" =>
            {
                if let (Some(href), Some(media_type)) =
                    (attribute(e, b"href"), attribute(e, b"media-type"))
                {
                    items.push(ManifestItem {
                        id: attribute(e, b"id").unwrap_or_default(),
                        href,
                        media_type,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Epub(format!(
                    "Malformed package document: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Resolves a manifest `href` against the package document's directory.
///
/// Hrefs are relative URLs: the fragment is dropped and each segment is
/// percent-decoded to match the archive entry name.
fn resolve_href(base_dir: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let mut segments: Vec<Cow<'_, str>> = base_dir
        .split('/')
        .filter(|s| !s.is_empty())
        .map(Cow::Borrowed)
        .collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(urlencoding::decode(other).unwrap_or(Cow::Borrowed(other))),
        }
    }
    segments.join("/")
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, ExtractionError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| ExtractionError::Epub(format!("Missing archive entry '{name}': {e}")))?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}
