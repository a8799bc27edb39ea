use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    audio_to_text_handler, file_processing_handler, general_stream_handler, health_handler,
    image_to_text_handler, minimal_data_handler, orthography_check_handler,
};
use crate::presentation::state::AppState;

/// Multipart framing overhead allowed on top of the file payloads.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit =
        state.upload.max_files * state.upload.max_file_size_bytes() + MULTIPART_OVERHEAD;

    let gpt = Router::new()
        .route("/orthography-check", post(orthography_check_handler))
        .route("/general-stream", post(general_stream_handler))
        .route("/minimal-data", post(minimal_data_handler))
        .route("/file-processing", post(file_processing_handler))
        .route("/image-to-text", post(image_to_text_handler))
        .route("/audio-to-text", post(audio_to_text_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/gpt", gpt)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
