use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use docbridge::application::ports::{TranscriptionEngine, TranscriptionError};
use docbridge::domain::TranscriptionOptions;
use docbridge::infrastructure::audio::{
    AzureWhisperEngine, OpenAiWhisperEngine, TranscriptionEngineFactory, audio_mime_type,
};
use docbridge::presentation::Settings;

#[derive(Default, Clone)]
struct Captured {
    fields: Arc<Mutex<HashMap<String, String>>>,
    file: Arc<Mutex<Option<(String, String)>>>,
    auth: Arc<Mutex<Option<String>>>,
}

async fn capture_form(
    State(captured): State<Captured>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    *captured.auth.lock().unwrap() = headers
        .get("authorization")
        .or_else(|| headers.get("api-key"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let mime = field.content_type().unwrap_or_default().to_string();
            *captured.file.lock().unwrap() = Some((filename, mime));
        } else {
            let value = field.text().await.unwrap();
            captured.fields.lock().unwrap().insert(name, value);
        }
    }
    (StatusCode::OK, "  Hola desde Whisper \n")
}

async fn start_mock_openai_server() -> (String, Captured, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Captured::default();

    let app = Router::new()
        .route("/v1/audio/transcriptions", post(capture_form))
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (format!("http://{}/v1", addr), captured, shutdown_tx)
}

async fn start_mock_azure_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/openai/deployments/my-deployment/audio/transcriptions",
        post(move || async move {
            let status = StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

#[test]
fn given_audio_filenames_when_resolving_mime_then_only_mp3_and_m4a_are_known() {
    assert_eq!(audio_mime_type("call.mp3").unwrap(), "audio/mpeg");
    assert_eq!(audio_mime_type("VOICE.M4A").unwrap(), "audio/mp4");
    assert!(matches!(
        audio_mime_type("track.flac"),
        Err(TranscriptionError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn given_options_when_openai_transcribes_then_form_carries_model_prompt_and_language() {
    let (base_url, captured, shutdown_tx) = start_mock_openai_server().await;
    let engine = OpenAiWhisperEngine::new(
        "sk-test".to_string(),
        Some(base_url),
        Some("whisper-1".to_string()),
    );
    let options = TranscriptionOptions {
        prompt: Some("names: Aitana".to_string()),
        language: Some("es".to_string()),
    };

    let text = engine
        .transcribe(b"ID3 fake", "call.mp3", &options)
        .await
        .unwrap();

    assert_eq!(text, "Hola desde Whisper");
    let fields = captured.fields.lock().unwrap().clone();
    assert_eq!(fields["model"], "whisper-1");
    assert_eq!(fields["response_format"], "text");
    assert_eq!(fields["prompt"], "names: Aitana");
    assert_eq!(fields["language"], "es");
    assert_eq!(
        captured.file.lock().unwrap().clone(),
        Some(("call.mp3".to_string(), "audio/mpeg".to_string()))
    );
    assert_eq!(
        captured.auth.lock().unwrap().as_deref(),
        Some("Bearer sk-test")
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_options_when_openai_transcribes_then_optional_fields_are_omitted() {
    let (base_url, captured, shutdown_tx) = start_mock_openai_server().await;
    let engine = OpenAiWhisperEngine::new("sk-test".to_string(), Some(base_url), None);

    engine
        .transcribe(b"\x00\x00", "memo.m4a", &TranscriptionOptions::default())
        .await
        .unwrap();

    let fields = captured.fields.lock().unwrap().clone();
    assert!(!fields.contains_key("prompt"));
    assert!(!fields.contains_key("language"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unsupported_audio_when_openai_transcribes_then_no_request_is_sent() {
    let (base_url, captured, shutdown_tx) = start_mock_openai_server().await;
    let engine = OpenAiWhisperEngine::new("sk-test".to_string(), Some(base_url), None);

    let result = engine
        .transcribe(b"RIFF", "clip.wav", &TranscriptionOptions::default())
        .await;

    assert!(matches!(result, Err(TranscriptionError::UnsupportedFormat(_))));
    assert!(captured.file.lock().unwrap().is_none());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_valid_audio_bytes_when_azure_transcribes_then_returns_display_text() {
    let response_body = r#"{"text": "Hello from Azure Whisper"}"#;
    let (base_url, shutdown_tx) = start_mock_azure_server(200, response_body).await;

    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");

    let result = engine
        .transcribe(b"fake audio bytes", "call.mp3", &TranscriptionOptions::default())
        .await;

    assert_eq!(result.unwrap(), "Hello from Azure Whisper");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_api_returns_error_status_when_transcribing_then_returns_api_error() {
    let response_body = r#"{"error": {"code": "InvalidRequest", "message": "bad audio"}}"#;
    let (base_url, shutdown_tx) = start_mock_azure_server(400, response_body).await;

    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");

    let result = engine
        .transcribe(b"bad audio", "call.mp3", &TranscriptionOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionError::ApiRequestFailed(msg)) if msg.contains("bad audio")
    ));
    shutdown_tx.send(()).ok();
}

#[test]
fn given_openai_provider_without_key_when_creating_engine_then_configuration_error() {
    let settings = Settings::defaults().unwrap().transcription;

    let result = TranscriptionEngineFactory::create(&settings);

    assert!(matches!(result, Err(TranscriptionError::Configuration(_))));
}

#[test]
fn given_openai_provider_with_key_when_creating_engine_then_succeeds() {
    let mut settings = Settings::defaults().unwrap().transcription;
    settings.api_key = Some("sk-test".to_string());

    assert!(TranscriptionEngineFactory::create(&settings).is_ok());
}
