use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use docbridge::application::services::{AnalysisPoller, CompletionService, Dispatcher};
use docbridge::infrastructure::audio::TranscriptionEngineFactory;
use docbridge::infrastructure::llm::create_llm_client;
use docbridge::infrastructure::observability::{TracingConfig, init_tracing};
use docbridge::infrastructure::ocr::TextractAdapter;
use docbridge::infrastructure::storage::ObjectStorageFactory;
use docbridge::infrastructure::text_processing::{DocxAdapter, PdfAdapter};
use docbridge::infrastructure::time::TokioClock;
use docbridge::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment));

    let pdf_adapter = Arc::new(PdfAdapter::new());
    let textract = Arc::new(TextractAdapter::from_region(&settings.ocr.region).await);
    let storage =
        ObjectStorageFactory::create(&settings.storage).context("Failed to create object storage")?;
    let transcription = TranscriptionEngineFactory::create(&settings.transcription)
        .context("Failed to create transcription engine")?;
    let llm = Arc::new(create_llm_client(&settings.llm).context("Failed to create LLM client")?);

    let poller = Arc::new(AnalysisPoller::new(
        storage,
        textract.clone(),
        Arc::new(TokioClock),
        settings.ocr.poller_settings(),
    ));

    let dispatcher = Arc::new(Dispatcher::new(
        pdf_adapter.clone(),
        pdf_adapter,
        Arc::new(DocxAdapter::new()),
        Arc::clone(&transcription),
        textract,
        poller,
    ));

    let completion_service = Arc::new(CompletionService::new(llm, dispatcher, transcription));

    let shutdown = CancellationToken::new();
    let state = AppState {
        completion_service,
        upload: settings.upload.clone(),
        shutdown: shutdown.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %environment, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
