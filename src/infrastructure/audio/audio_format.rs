use reqwest::multipart::{Form, Part};

use crate::application::ports::TranscriptionError;
use crate::domain::{TranscriptionOptions, extension_of};

/// MIME type sent with the multipart audio part.
pub fn audio_mime_type(filename: &str) -> Result<&'static str, TranscriptionError> {
    match extension_of(filename).as_str() {
        "mp3" => Ok("audio/mpeg"),
        "m4a" => Ok("audio/mp4"),
        other => Err(TranscriptionError::UnsupportedFormat(other.to_string())),
    }
}

/// Whisper upload form: the audio `file` part plus the optional hints.
pub(crate) fn transcription_form(
    audio_data: &[u8],
    filename: &str,
    options: &TranscriptionOptions,
) -> Result<Form, TranscriptionError> {
    let file = Part::bytes(audio_data.to_vec())
        .file_name(filename.to_string())
        .mime_str(audio_mime_type(filename)?)
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {e}")))?;

    let mut form = Form::new().part("file", file);
    if let Some(prompt) = &options.prompt {
        form = form.text("prompt", prompt.clone());
    }
    if let Some(language) = &options.language {
        form = form.text("language", language.clone());
    }
    Ok(form)
}

/// Sends the request and turns transport failures and non-2xx replies into
/// `ApiRequestFailed` carrying the provider's body.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, TranscriptionError> {
    let response = request
        .send()
        .await
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {e}")))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(TranscriptionError::ApiRequestFailed(format!(
        "status {status}: {body}"
    )))
}
