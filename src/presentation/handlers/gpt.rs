use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};

use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ApiError;
use super::upload_form::read_upload_form;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub filename: String,
    pub text: String,
}

pub async fn orthography_check_handler(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Orthography check");
    let review = state
        .completion_service
        .orthography_check(&request.prompt)
        .await?;
    Ok(Json(review))
}

pub async fn minimal_data_handler(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Minimal data extraction");
    let data = state.completion_service.minimal_data(&request.prompt).await?;
    Ok(Json(data))
}

/// Streams completion tokens to the caller as they arrive.
pub async fn general_stream_handler(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Response, ApiError> {
    tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "General stream");
    let tokens = state
        .completion_service
        .general_stream(&request.prompt)
        .await?;

    let body = tokens.map(|token| {
        if let Err(e) = &token {
            tracing::error!(error = %e, "Stream token error");
        }
        token.map(Bytes::from)
    });

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}

#[tracing::instrument(skip_all)]
pub async fn file_processing_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = read_upload_form(&mut multipart, &state.upload, "files").await?;
    if form.files.is_empty() {
        tracing::warn!("File processing request with no files");
        return Err(ApiError::bad_request("No files uploaded"));
    }

    let cancel = state.shutdown.child_token();
    let result = state
        .completion_service
        .process_files(&form.files, &form.options, &cancel)
        .await?;

    tracing::info!(files = form.files.len(), "File batch processed");
    Ok(Json(result))
}

#[tracing::instrument(skip_all)]
pub async fn image_to_text_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TextResponse>, ApiError> {
    let form = read_upload_form(&mut multipart, &state.upload, "file").await?;
    let file = form
        .files
        .first()
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    let text = state
        .completion_service
        .image_to_text(file, form.options.prompt.as_deref())
        .await?;

    Ok(Json(TextResponse {
        filename: file.filename.clone(),
        text,
    }))
}

#[tracing::instrument(skip_all)]
pub async fn audio_to_text_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TextResponse>, ApiError> {
    let form = read_upload_form(&mut multipart, &state.upload, "file").await?;
    let file = form
        .files
        .first()
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    let text = state
        .completion_service
        .audio_to_text(file, &form.options)
        .await?;

    Ok(Json(TextResponse {
        filename: file.filename.clone(),
        text,
    }))
}
