use async_trait::async_trait;

use crate::domain::TranscriptionOptions;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        options: &TranscriptionOptions,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("engine configuration invalid: {0}")]
    Configuration(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
