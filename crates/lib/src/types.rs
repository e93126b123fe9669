use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The declared format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    Pdf,
    Epub,
    #[default]
    PlainText,
}

impl MediaType {
    pub const PDF_MIME: &'static str = "application/pdf";
    pub const EPUB_MIME: &'static str = "application/epub+zip";
    pub const PLAIN_TEXT_MIME: &'static str = "text/plain";

    /// Maps a declared MIME type to a media type.
    ///
    /// Anything that is not PDF or EPUB is treated as plain text.
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            Self::PDF_MIME => MediaType::Pdf,
            Self::EPUB_MIME => MediaType::Epub,
            _ => MediaType::PlainText,
        }
    }

    /// Infers the media type from a file extension, falling back to plain text.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => MediaType::Pdf,
            "epub" => MediaType::Epub,
            _ => MediaType::PlainText,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => Self::PDF_MIME,
            MediaType::Epub => Self::EPUB_MIME,
            MediaType::PlainText => Self::PLAIN_TEXT_MIME,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Raw bytes of an upload together with their declared media type.
///
/// The content is shared, never mutated, and replaced wholesale by a new upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    content: Arc<[u8]>,
    media_type: MediaType,
}

impl UploadedDocument {
    pub fn new(content: impl Into<Vec<u8>>, media_type: MediaType) -> Self {
        Self {
            content: Arc::from(content.into()),
            media_type,
        }
    }

    /// Reads a document from disk.
    ///
    /// When `declared` is `None` the media type is inferred from the file extension.
    pub fn read_from(path: &Path, declared: Option<MediaType>) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let media_type = declared.unwrap_or_else(|| MediaType::from_path(path));
        Ok(Self::new(content, media_type))
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// The markdown payload recovered from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLessons {
    /// The cleaned markdown between the delimiters.
    pub markdown: String,
    /// Whether the response carried a closing `</markdown>` marker.
    pub closing_delimiter_found: bool,
}

impl ExtractedLessons {
    pub fn as_str(&self) -> &str {
        &self.markdown
    }
}

impl fmt::Display for ExtractedLessons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown)
    }
}
