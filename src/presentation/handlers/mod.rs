mod error;
mod gpt;
mod health;
mod upload_form;

pub use error::{ApiError, ErrorResponse};
pub use gpt::{
    PromptRequest, TextResponse, audio_to_text_handler, file_processing_handler,
    general_stream_handler, image_to_text_handler, minimal_data_handler,
    orthography_check_handler,
};
pub use health::health_handler;
pub use upload_form::{UploadForm, read_upload_form};
