mod analysis_feature;
mod analysis_job;
mod assembled_document;
mod file_category;
mod object_location;
mod recognized_block;
mod transcription_options;
mod uploaded_file;

pub use analysis_feature::{ANALYSIS_FEATURES, AnalysisFeature};
pub use analysis_job::{AnalysisJob, AnalysisPage, JobStatus};
pub use assembled_document::{AssembledDocument, DocumentEntry};
pub use file_category::FileCategory;
pub use object_location::ObjectLocation;
pub use recognized_block::{BlockType, RecognizedBlock, line_texts};
pub use transcription_options::TranscriptionOptions;
pub use uploaded_file::{UploadedFile, extension_of, stored_name_for};
