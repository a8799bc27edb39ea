mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    LlmProvider, LlmSettings, LoggingSettings, OcrSettings, ServerSettings, Settings,
    StorageProviderSetting, StorageSettings, TranscriptionProviderSetting, TranscriptionSettings,
    UploadSettings,
};
