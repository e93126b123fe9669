use crate::errors::ExtractionError;
use std::panic::{self, AssertUnwindSafe};

/// Extracts text from all pages of a PDF synchronously.
///
/// Each page keeps its own line breaks but loses trailing whitespace and leading or
/// trailing blank lines. Pages are appended in page order with no separator.
pub fn extract_text_from_pdf(pdf_data: &[u8]) -> Result<String, ExtractionError> {
    let pages = extract_pages(pdf_data)?;
    Ok(pages.iter().map(|page| tidy_page(page)).collect())
}

/// `pdf_extract` panics on some malformed input instead of returning an error.
fn extract_pages(pdf_data: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(pdf_data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(_) => Err(ExtractionError::Pdf(
            "the PDF parser gave up on a malformed document".to_string(),
        )),
    }
}

fn tidy_page(raw: &str) -> String {
    raw.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}
