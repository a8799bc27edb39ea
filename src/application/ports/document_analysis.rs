use async_trait::async_trait;

use crate::domain::{AnalysisFeature, AnalysisPage, ObjectLocation};

/// Asynchronous multi-page analysis of a stored object.
#[async_trait]
pub trait DocumentAnalysisService: Send + Sync {
    /// Starts a job and returns its identifier.
    async fn start(
        &self,
        location: &ObjectLocation,
        features: &[AnalysisFeature],
    ) -> Result<String, DocumentAnalysisError>;

    async fn get_status(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> Result<AnalysisPage, DocumentAnalysisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentAnalysisError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
