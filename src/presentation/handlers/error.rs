use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::LlmClientError;
use crate::application::services::{
    AnalysisError, CompletionError, DispatchError, ExtractionFailure,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// Error returned by every handler, rendered as a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                filename: None,
                stage: None,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn with_file(mut self, filename: Option<&str>, stage: Option<&str>) -> Self {
        self.body.filename = filename.map(str::to_string);
        self.body.stage = stage.map(str::to_string);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        let status = match &err {
            DispatchError::NoFiles => StatusCode::BAD_REQUEST,
            DispatchError::UnsupportedFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DispatchError::FileProcessing {
                source: ExtractionFailure::Analysis(AnalysisError::Timeout { .. }),
                ..
            } => StatusCode::GATEWAY_TIMEOUT,
            DispatchError::FileProcessing { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let stage = match &err {
            DispatchError::FileProcessing { stage, .. } => Some(stage.as_str()),
            _ => None,
        };
        Self::new(status, err.to_string()).with_file(err.filename(), stage)
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Dispatch(e) => e.into(),
            CompletionError::EmptyPrompt => Self::bad_request(err.to_string()),
            CompletionError::UnsupportedFileType { ref filename, .. } => {
                let filename = filename.clone();
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
                    .with_file(Some(&filename), None)
            }
            CompletionError::Llm(LlmClientError::RateLimited) => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, err.to_string())
            }
            CompletionError::Llm(_) | CompletionError::Transcription(_) => {
                Self::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
        }
    }
}
