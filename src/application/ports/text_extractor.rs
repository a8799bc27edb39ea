use async_trait::async_trait;

/// Local text-layer extraction (PDF, DOCX).
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns an empty string when the document carries no text layer.
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractionError>;
}

#[async_trait]
pub trait PageCounter: Send + Sync {
    async fn page_count(&self, data: &[u8]) -> Result<usize, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("extraction timed out")]
    TimedOut,
}
