use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::TranscriptionOptions;

use super::audio_format::{send_checked, transcription_form};

/// Whisper deployment on Azure OpenAI; authenticates with an `api-key`
/// header and answers with JSON.
pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct AzureTranscription {
    text: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/openai/deployments/{deployment}/audio/transcriptions?api-version={api_version}",
                base_url.trim_end_matches('/'),
            ),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    #[tracing::instrument(skip(self, audio_data, options), fields(bytes = audio_data.len()))]
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        options: &TranscriptionOptions,
    ) -> Result<String, TranscriptionError> {
        let form = transcription_form(audio_data, filename, options)?;
        tracing::debug!(endpoint = %self.endpoint, "Sending audio to Azure Whisper");

        let request = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .multipart(form);
        let transcription: AzureTranscription = send_checked(request)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {e}")))?;

        let text = transcription.text.trim().to_string();
        tracing::info!(chars = text.len(), "Azure Whisper transcription completed");
        Ok(text)
    }
}
