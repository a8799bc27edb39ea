use async_trait::async_trait;

use crate::domain::{AnalysisFeature, RecognizedBlock};

/// Synchronous cloud OCR over in-memory bytes.
#[async_trait]
pub trait OcrService: Send + Sync {
    async fn analyze(
        &self,
        data: &[u8],
        features: &[AnalysisFeature],
    ) -> Result<Vec<RecognizedBlock>, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr request failed: {0}")]
    RequestFailed(String),
    #[error("invalid ocr response: {0}")]
    InvalidResponse(String),
}
