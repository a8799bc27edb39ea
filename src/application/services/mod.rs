mod analysis_poller;
mod completion_service;
mod dispatcher;
pub mod prompts;

pub use analysis_poller::{
    AnalysisError, AnalysisPoller, DEFAULT_FOLDER, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL,
    PollerSettings,
};
pub use completion_service::{CompletionError, CompletionService, image_mime_type};
pub use dispatcher::{
    DispatchError, Dispatcher, ExtractionFailure, ExtractionStage, OcrRoute, Strategy,
};
