mod clock;
mod document_analysis;
mod llm_client;
mod object_storage;
mod ocr_service;
mod text_extractor;
mod transcription_engine;

pub use clock::Clock;
pub use document_analysis::{DocumentAnalysisError, DocumentAnalysisService};
pub use llm_client::{LlmClient, LlmClientError, LlmTokenStream, ResponseFormat};
pub use object_storage::{ObjectStorage, ObjectStorageError};
pub use ocr_service::{OcrError, OcrService};
pub use text_extractor::{ExtractionError, PageCounter, TextExtractor};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
