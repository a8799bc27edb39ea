use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{ExtractionError, PageCounter, TextExtractor};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Local PDF text-layer reader. Scanned PDFs come back as an empty string.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<PdfDocument, ExtractionError> {
        PdfDocument::open(path)
            .map_err(|e| ExtractionError::Malformed(format!("failed to parse PDF: {e}")))
    }

    fn read_pages(path: &Path) -> Result<Vec<String>, ExtractionError> {
        let mut doc = Self::open(path)?;
        let page_count = doc.page_count().map_err(|e| {
            ExtractionError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let pages = (0..page_count).map(|page_index| (page_index, doc.extract_text(page_index)));
        Ok(collect_page_texts(pages))
    }

    fn count_pages(path: &Path) -> Result<usize, ExtractionError> {
        let mut doc = Self::open(path)?;
        doc.page_count().map_err(|e| {
            ExtractionError::ExtractionFailed(format!("failed to read page count: {e}"))
        })
    }

    /// Writes `data` to a temp file and runs `job` on it off the runtime.
    async fn with_temp_file<T, F>(data: &[u8], job: F) -> Result<T, ExtractionError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, ExtractionError> + Send + 'static,
    {
        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            ExtractionError::ExtractionFailed(format!("failed to create temp file: {e}"))
        })?;

        temp_file.write_all(data).map_err(|e| {
            ExtractionError::ExtractionFailed(format!("failed to write temp file: {e}"))
        })?;

        tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || job(temp_file.path())),
        )
        .await
        .map_err(|_| ExtractionError::TimedOut)?
        .map_err(|e| ExtractionError::ExtractionFailed(format!("task join error: {e}")))?
    }
}

#[async_trait]
impl TextExtractor for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let pages = Self::with_temp_file(data, Self::read_pages).await?;
        tracing::info!(pages_with_text = pages.len(), "PDF text extraction complete");
        Ok(pages.join("\n\n"))
    }
}

#[async_trait]
impl PageCounter for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    async fn page_count(&self, data: &[u8]) -> Result<usize, ExtractionError> {
        Self::with_temp_file(data, Self::count_pages).await
    }
}

/// Sanitized text of every page that yielded some. Pages that fail to
/// extract are logged and skipped.
pub fn collect_page_texts<E: Display>(
    pages: impl IntoIterator<Item = (usize, Result<String, E>)>,
) -> Vec<String> {
    pages
        .into_iter()
        .filter_map(|(page_index, extracted)| match extracted {
            Ok(text) => Some(sanitize_extracted_text(&text)),
            Err(e) => {
                tracing::warn!(page = page_index, error = %e, "Failed to extract page text");
                None
            }
        })
        .filter(|text| !text.is_empty())
        .collect()
}
