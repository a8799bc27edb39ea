use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

pub type LlmTokenStream = Pin<Box<dyn Stream<Item = Result<String, LlmClientError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    JsonObject,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, LlmClientError>;

    async fn complete_stream(
        &self,
        instructions: &str,
        prompt: &str,
    ) -> Result<LlmTokenStream, LlmClientError>;

    async fn complete_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("client configuration invalid: {0}")]
    Configuration(String),
}
