use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{TranscriptionProviderSetting, TranscriptionSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match settings.provider {
            TranscriptionProviderSetting::OpenAi => {
                let key = settings.api_key.clone().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "API key required for OpenAI Whisper".to_string(),
                    )
                })?;
                tracing::info!(model = %settings.model, "Using OpenAI Whisper transcription");
                Ok(Arc::new(OpenAiWhisperEngine::new(
                    key,
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                )))
            }
            TranscriptionProviderSetting::Azure => {
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "base_url required for Azure Whisper".to_string(),
                    )
                })?;
                let key = settings.api_key.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "API key required for Azure Whisper".to_string(),
                    )
                })?;
                tracing::info!(deployment = %settings.azure_deployment, "Using Azure Whisper transcription");
                Ok(Arc::new(AzureWhisperEngine::new(
                    base_url,
                    &settings.azure_deployment,
                    key,
                    &settings.azure_api_version,
                )))
            }
        }
    }
}
