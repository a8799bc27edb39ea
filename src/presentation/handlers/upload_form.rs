use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::domain::{TranscriptionOptions, UploadedFile};
use crate::presentation::config::UploadSettings;

use super::error::ApiError;

/// Files plus the optional text fields that accompany them.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub options: TranscriptionOptions,
}

/// Collects every part named `file_field` and the `prompt` / `language`
/// text fields, enforcing the configured count and size limits.
pub async fn read_upload_form(
    multipart: &mut Multipart,
    limits: &UploadSettings,
    file_field: &str,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(ApiError::new(
                    e.status(),
                    format!("Failed to read multipart: {}", e.body_text()),
                ));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "prompt" | "language" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read {name}: {e}")))?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                if name == "prompt" {
                    form.options.prompt = value;
                } else {
                    form.options.language = value;
                }
            }
            n if n == file_field => {
                if form.files.len() >= limits.max_files {
                    tracing::warn!(max_files = limits.max_files, "Too many files uploaded");
                    return Err(ApiError::bad_request(format!(
                        "At most {} files may be uploaded",
                        limits.max_files
                    )));
                }

                let filename = field.file_name().unwrap_or("unknown").to_string();
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to read file bytes");
                    ApiError::bad_request(format!("Failed to read file: {e}"))
                })?;

                if data.len() > limits.max_file_size_bytes() {
                    tracing::warn!(filename = %filename, bytes = data.len(), "File exceeds size limit");
                    return Err(ApiError::new(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        format!(
                            "File {filename} exceeds the {} MB limit",
                            limits.max_file_size_mb
                        ),
                    ));
                }

                tracing::debug!(filename = %filename, bytes = data.len(), "File received");
                form.files.push(UploadedFile::new(filename, data));
            }
            other => tracing::debug!(field = other, "Ignoring multipart field"),
        }
    }

    Ok(form)
}
