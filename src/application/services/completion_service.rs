use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    LlmClient, LlmClientError, LlmTokenStream, ResponseFormat, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{FileCategory, TranscriptionOptions, UploadedFile};

use super::dispatcher::{DispatchError, Dispatcher};
use super::prompts;

/// Generative-text use cases exposed by the HTTP layer.
pub struct CompletionService {
    llm: Arc<dyn LlmClient>,
    dispatcher: Arc<Dispatcher>,
    transcription: Arc<dyn TranscriptionEngine>,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("unsupported file type: {extension}")]
    UnsupportedFileType { filename: String, extension: String },
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("llm: {0}")]
    Llm(#[from] LlmClientError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
}

impl CompletionService {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        dispatcher: Arc<Dispatcher>,
        transcription: Arc<dyn TranscriptionEngine>,
    ) -> Self {
        Self {
            llm,
            dispatcher,
            transcription,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn orthography_check(
        &self,
        prompt: &str,
    ) -> Result<serde_json::Value, CompletionError> {
        let prompt = non_empty(prompt)?;
        self.complete_json(prompts::ORTHOGRAPHY_CHECK, prompt).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn general_stream(&self, prompt: &str) -> Result<LlmTokenStream, CompletionError> {
        let prompt = non_empty(prompt)?;
        Ok(self
            .llm
            .complete_stream(prompts::GENERAL_ASSISTANT, prompt)
            .await?)
    }

    #[tracing::instrument(skip_all)]
    pub async fn minimal_data(&self, prompt: &str) -> Result<serde_json::Value, CompletionError> {
        let prompt = non_empty(prompt)?;
        self.complete_json(prompts::MINIMAL_DATA, prompt).await
    }

    /// Dispatches the batch and hands the assembled text to the LLM.
    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub async fn process_files(
        &self,
        files: &[UploadedFile],
        options: &TranscriptionOptions,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, CompletionError> {
        let document = self
            .dispatcher
            .process_batch(files, options, cancel)
            .await?;
        let text = document.render();
        tracing::info!(
            documents = document.len(),
            chars = text.len(),
            "Assembled document ready"
        );
        self.complete_json(prompts::FILE_PROCESSING, &text).await
    }

    #[tracing::instrument(skip_all, fields(filename = %file.filename))]
    pub async fn image_to_text(
        &self,
        file: &UploadedFile,
        prompt: Option<&str>,
    ) -> Result<String, CompletionError> {
        let mime_type = image_mime_type(&file.extension).ok_or_else(|| {
            CompletionError::UnsupportedFileType {
                filename: file.filename.clone(),
                extension: file.extension.clone(),
            }
        })?;
        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(prompts::IMAGE_TO_TEXT);

        Ok(self
            .llm
            .complete_with_image(prompt, &file.data, mime_type)
            .await?)
    }

    #[tracing::instrument(skip_all, fields(filename = %file.filename))]
    pub async fn audio_to_text(
        &self,
        file: &UploadedFile,
        options: &TranscriptionOptions,
    ) -> Result<String, CompletionError> {
        if file.category() != FileCategory::Audio {
            return Err(CompletionError::UnsupportedFileType {
                filename: file.filename.clone(),
                extension: file.extension.clone(),
            });
        }
        Ok(self
            .transcription
            .transcribe(&file.data, &file.filename, options)
            .await?)
    }

    async fn complete_json(
        &self,
        instructions: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, CompletionError> {
        let raw = self
            .llm
            .complete(instructions, prompt, ResponseFormat::JsonObject)
            .await?;
        serde_json::from_str(&raw).map_err(|e| {
            CompletionError::Llm(LlmClientError::InvalidResponse(format!(
                "expected JSON object: {e}"
            )))
        })
    }
}

fn non_empty(prompt: &str) -> Result<&str, CompletionError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CompletionError::EmptyPrompt);
    }
    Ok(trimmed)
}

pub fn image_mime_type(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
