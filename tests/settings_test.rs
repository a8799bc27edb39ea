use std::time::Duration;

use docbridge::infrastructure::observability::TracingConfig;
use docbridge::presentation::config::{
    Environment, LlmProvider, StorageProviderSetting, TranscriptionProviderSetting,
    UploadSettings,
};
use docbridge::presentation::Settings;

#[test]
fn given_no_sources_when_loading_defaults_then_documented_values_apply() {
    let settings = Settings::defaults().unwrap();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
    assert_eq!(settings.llm.chat_model, "gpt-4o-mini");
    assert_eq!(
        settings.transcription.provider,
        TranscriptionProviderSetting::OpenAi
    );
    assert_eq!(settings.transcription.model, "whisper-1");
    assert_eq!(settings.storage.provider, StorageProviderSetting::S3);
    assert_eq!(settings.upload.max_files, 20);
    assert_eq!(settings.upload.max_file_size_mb, 5);
    assert!(!settings.logging.json);
}

#[test]
fn given_default_ocr_settings_when_building_poller_settings_then_interval_and_wait_match() {
    let poller = Settings::defaults().unwrap().ocr.poller_settings();

    assert_eq!(poller.folder, "textract_documents");
    assert_eq!(poller.poll_interval, Duration::from_secs(5));
    assert_eq!(poller.max_wait, Duration::from_secs(300));
}

#[test]
fn given_upload_limits_when_converting_then_megabytes_become_bytes() {
    let limits = UploadSettings::default();

    assert_eq!(limits.max_file_size_bytes(), 5 * 1024 * 1024);
}

#[test]
fn given_environment_names_when_parsing_then_aliases_are_accepted() {
    assert_eq!(
        Environment::try_from("PROD".to_string()).unwrap(),
        Environment::Prod
    );
    assert_eq!(
        Environment::try_from("production".to_string()).unwrap(),
        Environment::Prod
    );
    assert_eq!(
        Environment::try_from("local".to_string()).unwrap(),
        Environment::Local
    );
    assert!(Environment::try_from("staging".to_string()).is_err());
}

#[test]
fn given_prod_settings_when_building_tracing_config_then_environment_is_carried() {
    let mut settings = Settings::defaults().unwrap();
    settings.logging.json = true;
    settings.logging.filter = Some("warn".to_string());

    let config = TracingConfig::from_settings(&settings.logging, Environment::Prod);

    assert!(config.json_format);
    assert_eq!(config.filter, "warn");
    assert_eq!(config.environment, "prod");
}
