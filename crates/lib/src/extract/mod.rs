//! # Text Extraction
//!
//! Turns the raw bytes of an upload into plain text. The declared media type selects
//! exactly one extractor:
//!
//! - [`MediaType::Pdf`]: page text concatenated in page order ([`pdf`]).
//! - [`MediaType::Epub`]: text of every XHTML item in manifest order ([`epub`]).
//! - [`MediaType::PlainText`]: strict UTF-8 decoding.
//!
//! Extraction is pure, so [`ExtractionCache`] can memoize it by content and type.

pub mod epub;
pub mod pdf;

use crate::{
    errors::ExtractionError,
    types::{MediaType, UploadedDocument},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Extracts the full text of `content` according to its declared media type.
#[instrument(skip(content), fields(bytes = content.len()))]
pub fn extract_text(content: &[u8], media_type: MediaType) -> Result<String, ExtractionError> {
    let result = match media_type {
        MediaType::Pdf => pdf::extract_text_from_pdf(content),
        MediaType::Epub => epub::extract_text_from_epub(content),
        MediaType::PlainText => decode_plain_text(content),
    };

    match &result {
        Ok(text) => debug!("Extracted {} characters of text.", text.chars().count()),
        Err(e) => warn!("Text extraction failed: {e}"),
    }
    result
}

/// Extracts the full text of an uploaded document.
pub fn extract(document: &UploadedDocument) -> Result<String, ExtractionError> {
    extract_text(document.content(), document.media_type())
}

fn decode_plain_text(content: &[u8]) -> Result<String, ExtractionError> {
    Ok(std::str::from_utf8(content)?.to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    digest: [u8; 16],
    len: usize,
    media_type: MediaType,
}

impl CacheKey {
    fn for_document(document: &UploadedDocument) -> Self {
        Self {
            digest: md5::compute(document.content()).0,
            len: document.content().len(),
            media_type: document.media_type(),
        }
    }
}

/// Memoizes extracted text by (content digest, media type).
///
/// Failures are not cached; a later call retries the extraction.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<CacheKey, Arc<str>>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached text for `document`, extracting it on first use.
    pub fn get_or_extract(
        &mut self,
        document: &UploadedDocument,
    ) -> Result<Arc<str>, ExtractionError> {
        let key = CacheKey::for_document(document);
        if let Some(text) = self.entries.get(&key) {
            debug!("Extraction cache hit for {} document.", key.media_type);
            return Ok(Arc::clone(text));
        }

        let text: Arc<str> = Arc::from(extract(document)?);
        self.entries.insert(key, Arc::clone(&text));
        Ok(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
