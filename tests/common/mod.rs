#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

use docbridge::application::ports::{
    Clock, DocumentAnalysisError, DocumentAnalysisService, ExtractionError, LlmClient,
    LlmClientError, LlmTokenStream, ObjectStorage, ObjectStorageError, OcrError, OcrService,
    PageCounter, ResponseFormat, TextExtractor, TranscriptionEngine, TranscriptionError,
};
use docbridge::application::services::{AnalysisPoller, Dispatcher, PollerSettings};
use docbridge::domain::{
    AnalysisFeature, AnalysisPage, ObjectLocation, RecognizedBlock, TranscriptionOptions,
    UploadedFile,
};
use docbridge::infrastructure::storage::ObjectStoreStorage;

pub const BUCKET: &str = "test-bucket";

pub fn upload(filename: &str, data: &'static [u8]) -> UploadedFile {
    UploadedFile::new(filename.to_string(), Bytes::from_static(data))
}

pub fn lines(texts: &[&str]) -> Vec<RecognizedBlock> {
    texts.iter().map(|t| RecognizedBlock::line(*t)).collect()
}

/// Clock whose sleeps return immediately and advance virtual time.
pub struct FakeClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.elapsed.lock().unwrap() += duration;
    }
}

/// Clock whose sleeps never finish, for cancellation tests.
pub struct StalledClock;

#[async_trait::async_trait]
impl Clock for StalledClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}

/// Analysis backend that replays a fixed script of status pages. Once the
/// script runs out it keeps answering `IN_PROGRESS`.
pub struct ScriptedAnalysis {
    script: Mutex<VecDeque<Result<AnalysisPage, DocumentAnalysisError>>>,
    start_error: Option<String>,
    pub queries: Mutex<Vec<Option<String>>>,
    pub started: Mutex<Vec<(ObjectLocation, Vec<AnalysisFeature>)>>,
}

impl ScriptedAnalysis {
    pub fn new(script: Vec<AnalysisPage>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().map(Ok).collect()),
            start_error: None,
            queries: Mutex::new(Vec::new()),
            started: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_start(message: &str) -> Self {
        Self {
            start_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_query_error(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(DocumentAnalysisError::ApiRequestFailed(
                message.to_string(),
            )));
        self
    }

    pub fn queries(&self) -> Vec<Option<String>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn status_checks(&self) -> usize {
        self.queries().iter().filter(|t| t.is_none()).count()
    }

    pub fn page_fetches(&self) -> usize {
        self.queries().iter().filter(|t| t.is_some()).count()
    }
}

#[async_trait::async_trait]
impl DocumentAnalysisService for ScriptedAnalysis {
    async fn start(
        &self,
        location: &ObjectLocation,
        features: &[AnalysisFeature],
    ) -> Result<String, DocumentAnalysisError> {
        if let Some(message) = &self.start_error {
            return Err(DocumentAnalysisError::ApiRequestFailed(message.clone()));
        }
        self.started
            .lock()
            .unwrap()
            .push((location.clone(), features.to_vec()));
        Ok("job-1".to_string())
    }

    async fn get_status(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> Result<AnalysisPage, DocumentAnalysisError> {
        assert_eq!(job_id, "job-1");
        self.queries
            .lock()
            .unwrap()
            .push(next_token.map(str::to_string));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AnalysisPage::in_progress()))
    }
}

/// Analysis backend whose status queries never answer.
pub struct HangingAnalysis {
    pub status_checks: AtomicUsize,
}

impl HangingAnalysis {
    pub fn new() -> Self {
        Self {
            status_checks: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl DocumentAnalysisService for HangingAnalysis {
    async fn start(
        &self,
        _location: &ObjectLocation,
        _features: &[AnalysisFeature],
    ) -> Result<String, DocumentAnalysisError> {
        Ok("job-1".to_string())
    }

    async fn get_status(
        &self,
        _job_id: &str,
        _next_token: Option<&str>,
    ) -> Result<AnalysisPage, DocumentAnalysisError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Storage whose uploads never complete.
pub struct HangingStorage;

#[async_trait::async_trait]
impl ObjectStorage for HangingStorage {
    async fn put(&self, _key: &str, _data: Bytes) -> Result<ObjectLocation, ObjectStorageError> {
        std::future::pending().await
    }
}

pub struct FailingStorage;

#[async_trait::async_trait]
impl ObjectStorage for FailingStorage {
    async fn put(&self, _key: &str, _data: Bytes) -> Result<ObjectLocation, ObjectStorageError> {
        Err(ObjectStorageError::UploadFailed("access denied".to_string()))
    }
}

pub struct StubPdf {
    text: String,
    pages: usize,
    pub text_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
}

impl StubPdf {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pages: 1,
            text_calls: AtomicUsize::new(0),
            page_calls: AtomicUsize::new(0),
        }
    }

    pub fn scanned(pages: usize) -> Self {
        Self {
            text: String::new(),
            pages,
            ..Self::with_text("")
        }
    }
}

#[async_trait::async_trait]
impl TextExtractor for StubPdf {
    async fn extract_text(&self, _data: &[u8]) -> Result<String, ExtractionError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

#[async_trait::async_trait]
impl PageCounter for StubPdf {
    async fn page_count(&self, _data: &[u8]) -> Result<usize, ExtractionError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages)
    }
}

pub struct StubDocx {
    result: Result<String, String>,
    pub calls: AtomicUsize,
}

impl StubDocx {
    pub fn with_text(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl TextExtractor for StubDocx {
    async fn extract_text(&self, _data: &[u8]) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map_err(ExtractionError::Malformed)
    }
}

pub struct StubTranscription {
    text: String,
    pub seen: Mutex<Vec<(String, TranscriptionOptions)>>,
}

impl StubTranscription {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for StubTranscription {
    async fn transcribe(
        &self,
        _audio_data: &[u8],
        filename: &str,
        options: &TranscriptionOptions,
    ) -> Result<String, TranscriptionError> {
        self.seen
            .lock()
            .unwrap()
            .push((filename.to_string(), options.clone()));
        Ok(self.text.clone())
    }
}

pub struct StubOcr {
    blocks: Vec<RecognizedBlock>,
    pub calls: AtomicUsize,
    pub features: Mutex<Vec<AnalysisFeature>>,
}

impl StubOcr {
    pub fn with_blocks(blocks: Vec<RecognizedBlock>) -> Self {
        Self {
            blocks,
            calls: AtomicUsize::new(0),
            features: Mutex::new(Vec::new()),
        }
    }

    pub fn with_lines(texts: &[&str]) -> Self {
        Self::with_blocks(lines(texts))
    }
}

#[async_trait::async_trait]
impl OcrService for StubOcr {
    async fn analyze(
        &self,
        _data: &[u8],
        features: &[AnalysisFeature],
    ) -> Result<Vec<RecognizedBlock>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.features.lock().unwrap() = features.to_vec();
        Ok(self.blocks.clone())
    }
}

pub struct MockLlmClient {
    pub response: String,
    pub tokens: Vec<&'static str>,
    pub prompts: Mutex<Vec<(String, String, ResponseFormat)>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            tokens: vec!["Hello", ", ", "world"],
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<(String, String, ResponseFormat)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, LlmClientError> {
        self.prompts
            .lock()
            .unwrap()
            .push((instructions.to_string(), prompt.to_string(), format));
        Ok(self.response.clone())
    }

    async fn complete_stream(
        &self,
        _instructions: &str,
        _prompt: &str,
    ) -> Result<LlmTokenStream, LlmClientError> {
        let tokens: Vec<Result<String, LlmClientError>> =
            self.tokens.iter().map(|t| Ok(t.to_string())).collect();
        Ok(Box::pin(futures::stream::iter(tokens)))
    }

    async fn complete_with_image(
        &self,
        prompt: &str,
        _image: &[u8],
        mime_type: &str,
    ) -> Result<String, LlmClientError> {
        Ok(format!("{mime_type}: {prompt}"))
    }
}

/// Every collaborator of the dispatcher, kept around for inspection.
pub struct Harness {
    pub pdf: Arc<StubPdf>,
    pub docx: Arc<StubDocx>,
    pub transcription: Arc<StubTranscription>,
    pub ocr: Arc<StubOcr>,
    pub analysis: Arc<ScriptedAnalysis>,
    pub storage: Arc<ObjectStoreStorage>,
    pub clock: Arc<FakeClock>,
}

impl Harness {
    pub fn new(pdf: StubPdf) -> Self {
        Self {
            pdf: Arc::new(pdf),
            docx: Arc::new(StubDocx::with_text("docx body")),
            transcription: Arc::new(StubTranscription::with_text("audio transcript")),
            ocr: Arc::new(StubOcr::with_lines(&["ocr line one", "ocr line two"])),
            analysis: Arc::new(ScriptedAnalysis::new(vec![AnalysisPage::succeeded(
                lines(&["async page text"]),
                None,
            )])),
            storage: Arc::new(ObjectStoreStorage::in_memory(BUCKET)),
            clock: Arc::new(FakeClock::new()),
        }
    }

    pub fn with_docx(mut self, docx: StubDocx) -> Self {
        self.docx = Arc::new(docx);
        self
    }

    pub fn with_analysis(mut self, analysis: ScriptedAnalysis) -> Self {
        self.analysis = Arc::new(analysis);
        self
    }

    pub fn with_ocr(mut self, ocr: StubOcr) -> Self {
        self.ocr = Arc::new(ocr);
        self
    }

    pub fn poller(&self) -> Arc<AnalysisPoller> {
        Arc::new(AnalysisPoller::new(
            self.storage.clone(),
            self.analysis.clone(),
            self.clock.clone(),
            PollerSettings::default(),
        ))
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.pdf.clone(),
            self.pdf.clone(),
            self.docx.clone(),
            self.transcription.clone(),
            self.ocr.clone(),
            self.poller(),
        )
    }

    pub fn ocr_calls(&self) -> usize {
        self.ocr.calls.load(Ordering::SeqCst)
    }

    pub fn analysis_starts(&self) -> usize {
        self.analysis.started.lock().unwrap().len()
    }
}
