use serde::Deserialize;

/// Caller-supplied hints forwarded untouched to speech-to-text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranscriptionOptions {
    pub prompt: Option<String>,
    pub language: Option<String>,
}
