mod textract_adapter;

pub use textract_adapter::{TextractAdapter, analysis_page, recognized_blocks};
