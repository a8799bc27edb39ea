use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::PollerSettings;

use super::environment::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub ocr: OcrSettings,
    pub storage: StorageSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
    #[serde(rename = "lmstudio")]
    LmStudio,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub api_key: String,
    pub base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_api_version: String,
    pub chat_model: String,
    pub vision_model: Option<String>,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: String,
    pub azure_api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub region: String,
    pub folder: String,
    pub poll_interval_secs: u64,
    pub max_wait_secs: u64,
}

impl OcrSettings {
    pub fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            folder: self.folder.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_wait: Duration::from_secs(self.max_wait_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    S3,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_files: usize,
    pub max_file_size_mb: usize,
}

pub const DEFAULT_MAX_FILES: usize = 20;
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 5;

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl UploadSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
    pub filter: Option<String>,
}

impl Settings {
    /// Layers code defaults, `appsettings.<environment>` and `APP_*`
    /// variables (`APP_LLM__API_KEY` sets `llm.api_key`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Code defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("llm.provider", "openai")?
            .set_default("llm.api_key", "")?
            .set_default("llm.azure_api_version", "2024-10-21")?
            .set_default("llm.chat_model", "gpt-4o-mini")?
            .set_default("llm.max_tokens", 2048)?
            .set_default("llm.temperature", 0.3)?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.azure_deployment", "whisper")?
            .set_default("transcription.azure_api_version", "2024-06-01")?
            .set_default("ocr.region", "us-east-1")?
            .set_default("ocr.folder", "textract_documents")?
            .set_default("ocr.poll_interval_secs", 5)?
            .set_default("ocr.max_wait_secs", 300)?
            .set_default("storage.provider", "s3")?
            .set_default("storage.bucket", "docbridge-uploads")?
            .set_default("storage.region", "us-east-1")?
            .set_default("upload.max_files", DEFAULT_MAX_FILES as u64)?
            .set_default("upload.max_file_size_mb", DEFAULT_MAX_FILE_SIZE_MB as u64)?
            .set_default("logging.json", false)
    }
}
