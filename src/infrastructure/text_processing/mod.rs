mod docx_adapter;
mod pdf_adapter;
mod text_sanitizer;

pub use docx_adapter::{DocxAdapter, plaintext_from_document_xml};
pub use pdf_adapter::{PdfAdapter, collect_page_texts};
pub use text_sanitizer::sanitize_extracted_text;
