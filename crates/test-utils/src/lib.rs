use async_trait::async_trait;
use keylessons::errors::PromptError;
use keylessons::providers::ai::AiProvider;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, String)>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for any prompt containing `key`.
    /// The first matching key, in insertion order, wins.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), response.to_string()));
    }

    /// Makes every call fail with an API error carrying `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Retrieves the recorded `(prompt, api_key)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), api_key.to_string()));

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(PromptError::AiApi(message));
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key.as_str()) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for prompt. Got: '{prompt}'"
        )))
    }
}

// --- Test-Specific Helpers ---
pub mod helpers {
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    #[cfg(feature = "pdf")]
    pub use pdf::generate_test_pdf;

    #[cfg(feature = "pdf")]
    mod pdf {
        use anyhow::Result;
        use printpdf::{
            BuiltinFont, Layer, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Pt,
            TextItem, TextMatrix, TextRenderingMode,
        };

        /// Generates an A4 PDF with one page per entry of `pages`. Each line of an entry
        /// is written as its own text section, one below the other.
        pub fn generate_test_pdf(pages: &[&str]) -> Result<Vec<u8>> {
            let mut doc = PdfDocument::new("Test PDF");
            let layer_id = doc.add_layer(&Layer::new("Layer 1"));

            let font_bytes = BuiltinFont::Helvetica.get_subset_font().bytes;
            let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
                .ok_or_else(|| anyhow::anyhow!("Failed to parse built-in font"))?;
            let font_id = doc.add_font(&font);

            for text in pages {
                let mut ops = vec![Op::BeginLayer {
                    layer_id: layer_id.clone(),
                }];
                for (i, line) in text.lines().enumerate() {
                    ops.extend([
                        Op::StartTextSection,
                        Op::SetFontSize {
                            size: Pt(12.0),
                            font: font_id.clone(),
                        },
                        Op::SetTextMatrix {
                            matrix: TextMatrix::Translate(
                                Mm(20.0).into(),
                                Mm(280.0 - 10.0 * i as f32).into(),
                            ),
                        },
                        Op::SetTextRenderingMode {
                            mode: TextRenderingMode::Fill,
                        },
                        Op::WriteText {
                            items: vec![TextItem::Text(line.to_string())],
                            font: font_id.clone(),
                        },
                        Op::EndTextSection,
                    ]);
                }
                ops.push(Op::EndLayer {
                    layer_id: layer_id.clone(),
                });
                doc.pages.push(PdfPage::new(Mm(210.0), Mm(297.0), ops));
            }

            let mut warnings = Vec::new();
            let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
            if !warnings.is_empty() {
                eprintln!("PDF generation warnings: {warnings:?}");
            }
            Ok(bytes)
        }
    }

    /// A content document inside a generated EPUB.
    pub struct EpubItem<'a> {
        pub id: &'a str,
        pub href: &'a str,
        pub media_type: &'a str,
        pub body: &'a str,
        /// When false the item is listed in the manifest but not written to the archive.
        pub in_archive: bool,
        /// The entry name under `OEBPS/`, when it differs from `href`.
        pub archive_name: Option<&'a str>,
    }

    impl<'a> EpubItem<'a> {
        /// An XHTML chapter whose `<body>` is `body`.
        pub fn chapter(id: &'a str, href: &'a str, body: &'a str) -> Self {
            Self {
                id,
                href,
                media_type: "application/xhtml+xml",
                body,
                in_archive: true,
                archive_name: None,
            }
        }

        /// Lists the item in the manifest without writing its file.
        pub fn missing(mut self) -> Self {
            self.in_archive = false;
            self
        }

        /// Writes the item under `OEBPS/{name}` while the manifest keeps `href`.
        pub fn stored_as(mut self, name: &'a str) -> Self {
            self.archive_name = Some(name);
            self
        }
    }

    /// Generates an EPUB whose package document lives at `OEBPS/content.opf` and lists
    /// `items` in the given order. XHTML items are wrapped in a minimal document.
    pub fn generate_test_epub(items: &[EpubItem<'_>]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = || SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            || SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored())?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated())?;
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
        )?;

        let manifest = items
            .iter()
            .map(|item| {
                format!(
                    r#"    <item id="{}" href="{}" media-type="{}"/>"#,
                    item.id, item.href, item.media_type
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let package = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">test-book</dc:identifier>
    <dc:title>Test Book</dc:title>
  </metadata>
  <manifest>
{manifest}
  </manifest>
  <spine/>
</package>"#
        );
        zip.start_file("OEBPS/content.opf", deflated())?;
        zip.write_all(package.as_bytes())?;

        for item in items.iter().filter(|item| item.in_archive) {
            let name = item.archive_name.unwrap_or(item.href);
            zip.start_file(format!("OEBPS/{name}"), deflated())?;
            if item.media_type == "application/xhtml+xml" {
                let document = format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title></title></head><body>{}</body></html>"#,
                    item.body
                );
                zip.write_all(document.as_bytes())?;
            } else {
                zip.write_all(item.body.as_bytes())?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }
}
