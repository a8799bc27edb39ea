use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    ExtractionError, OcrError, OcrService, PageCounter, TextExtractor, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{
    ANALYSIS_FEATURES, AssembledDocument, FileCategory, TranscriptionOptions, UploadedFile,
    line_texts,
};

use super::analysis_poller::{AnalysisError, AnalysisPoller};

/// Where a PDF without a text layer is sent for recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrRoute {
    Sync,
    Async,
}

impl OcrRoute {
    pub fn for_page_count(pages: usize) -> Self {
        if pages > 1 { Self::Async } else { Self::Sync }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    PdfText,
    PageCount,
    Docx,
    Transcription,
    SyncOcr,
    AsyncAnalysis,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PdfText => "pdf_text",
            Self::PageCount => "page_count",
            Self::Docx => "docx_text",
            Self::Transcription => "transcription",
            Self::SyncOcr => "sync_ocr",
            Self::AsyncAnalysis => "async_analysis",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionFailure {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error(transparent)]
    Ocr(#[from] OcrError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no files uploaded")]
    NoFiles,
    #[error("unsupported file type: {extension}")]
    UnsupportedFileType { filename: String, extension: String },
    #[error("error processing file {filename} ({stage}): {source}")]
    FileProcessing {
        filename: String,
        stage: ExtractionStage,
        #[source]
        source: ExtractionFailure,
    },
}

impl DispatchError {
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::NoFiles => None,
            Self::UnsupportedFileType { filename, .. } | Self::FileProcessing { filename, .. } => {
                Some(filename)
            }
        }
    }
}

type StageResult<T> = Result<T, (ExtractionStage, ExtractionFailure)>;

fn at<E: Into<ExtractionFailure>>(
    stage: ExtractionStage,
) -> impl FnOnce(E) -> (ExtractionStage, ExtractionFailure) {
    move |e| (stage, e.into())
}

/// Extraction path for a supported file category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PdfTextLayer,
    DocxText,
    SpeechToText,
    SyncOcr,
}

impl Strategy {
    pub fn for_category(category: &FileCategory) -> Option<Self> {
        match category {
            FileCategory::Pdf => Some(Self::PdfTextLayer),
            FileCategory::Docx => Some(Self::DocxText),
            FileCategory::Audio => Some(Self::SpeechToText),
            FileCategory::Image => Some(Self::SyncOcr),
            FileCategory::Unsupported(_) => None,
        }
    }
}

/// Routes each uploaded file to one extraction collaborator and assembles
/// the results in submission order. The first failure aborts the batch.
pub struct Dispatcher {
    pdf_extractor: Arc<dyn TextExtractor>,
    page_counter: Arc<dyn PageCounter>,
    docx_extractor: Arc<dyn TextExtractor>,
    transcription: Arc<dyn TranscriptionEngine>,
    ocr: Arc<dyn OcrService>,
    poller: Arc<AnalysisPoller>,
}

impl Dispatcher {
    pub fn new(
        pdf_extractor: Arc<dyn TextExtractor>,
        page_counter: Arc<dyn PageCounter>,
        docx_extractor: Arc<dyn TextExtractor>,
        transcription: Arc<dyn TranscriptionEngine>,
        ocr: Arc<dyn OcrService>,
        poller: Arc<AnalysisPoller>,
    ) -> Self {
        Self {
            pdf_extractor,
            page_counter,
            docx_extractor,
            transcription,
            ocr,
            poller,
        }
    }

    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub async fn process_batch(
        &self,
        files: &[UploadedFile],
        options: &TranscriptionOptions,
        cancel: &CancellationToken,
    ) -> Result<AssembledDocument, DispatchError> {
        if files.is_empty() {
            return Err(DispatchError::NoFiles);
        }

        let plan = files
            .iter()
            .map(|file| match Strategy::for_category(&file.category()) {
                Some(strategy) => Ok((file, strategy)),
                None => {
                    tracing::warn!(filename = %file.filename, extension = %file.extension, "Unsupported file type");
                    Err(DispatchError::UnsupportedFileType {
                        filename: file.filename.clone(),
                        extension: file.extension.clone(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut document = AssembledDocument::new();
        for (file, strategy) in plan {
            tracing::info!(
                filename = %file.filename,
                stored_name = %file.stored_name,
                bytes = file.size_bytes,
                ?strategy,
                "Processing file"
            );

            let content = self
                .extract(file, strategy, options, cancel)
                .await
                .map_err(|(stage, source)| {
                    tracing::error!(filename = %file.filename, %stage, error = %source, "Error processing file");
                    DispatchError::FileProcessing {
                        filename: file.filename.clone(),
                        stage,
                        source,
                    }
                })?;

            document.push(file.filename.clone(), content);
        }

        Ok(document)
    }

    async fn extract(
        &self,
        file: &UploadedFile,
        strategy: Strategy,
        options: &TranscriptionOptions,
        cancel: &CancellationToken,
    ) -> StageResult<String> {
        match strategy {
            Strategy::PdfTextLayer => self.extract_pdf(file, cancel).await,
            Strategy::DocxText => self
                .docx_extractor
                .extract_text(&file.data)
                .await
                .map_err(at(ExtractionStage::Docx)),
            Strategy::SpeechToText => self
                .transcription
                .transcribe(&file.data, &file.filename, options)
                .await
                .map_err(at(ExtractionStage::Transcription)),
            Strategy::SyncOcr => self.recognize_sync(file).await,
        }
    }

    async fn extract_pdf(
        &self,
        file: &UploadedFile,
        cancel: &CancellationToken,
    ) -> StageResult<String> {
        let text = self
            .pdf_extractor
            .extract_text(&file.data)
            .await
            .map_err(at(ExtractionStage::PdfText))?;

        if !text.trim().is_empty() {
            return Ok(text);
        }

        let pages = self
            .page_counter
            .page_count(&file.data)
            .await
            .map_err(at(ExtractionStage::PageCount))?;
        let route = OcrRoute::for_page_count(pages);
        tracing::info!(filename = %file.filename, pages, ?route, "PDF has no text layer");

        match route {
            OcrRoute::Sync => self.recognize_sync(file).await,
            OcrRoute::Async => self
                .poller
                .run(&file.filename, file.data.clone(), cancel)
                .await
                .map_err(at(ExtractionStage::AsyncAnalysis)),
        }
    }

    async fn recognize_sync(&self, file: &UploadedFile) -> StageResult<String> {
        let blocks = self
            .ocr
            .analyze(&file.data, &ANALYSIS_FEATURES)
            .await
            .map_err(at(ExtractionStage::SyncOcr))?;
        Ok(line_texts(&blocks).collect::<Vec<_>>().join(" "))
    }
}
