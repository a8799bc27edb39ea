mod audio_format;
mod azure_whisper_engine;
mod openai_whisper_engine;
mod transcription_engine_factory;

pub use audio_format::audio_mime_type;
pub use azure_whisper_engine::AzureWhisperEngine;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
