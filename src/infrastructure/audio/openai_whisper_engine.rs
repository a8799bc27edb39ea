use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::TranscriptionOptions;

use super::audio_format::{send_checked, transcription_form};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "whisper-1";

/// OpenAI `/audio/transcriptions`, asking for a plain-text reply.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    #[tracing::instrument(skip(self, audio_data, options), fields(bytes = audio_data.len(), model = %self.model))]
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        options: &TranscriptionOptions,
    ) -> Result<String, TranscriptionError> {
        let form = transcription_form(audio_data, filename, options)?
            .text("model", self.model.clone())
            .text("response_format", "text");

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form);
        let transcript = send_checked(request)
            .await?
            .text()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {e}")))?;

        let text = transcript.trim().to_string();
        tracing::info!(chars = text.len(), "OpenAI Whisper transcription completed");
        Ok(text)
    }
}
