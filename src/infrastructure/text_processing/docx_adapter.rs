use std::io::{Cursor, Read};
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::application::ports::{ExtractionError, TextExtractor};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the raw text of a DOCX main document part.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read_document_xml(data: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| ExtractionError::Malformed(format!("not a DOCX archive: {e}")))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ExtractionError::Malformed(format!("missing {DOCUMENT_PART}: {e}")))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| ExtractionError::ExtractionFailed(format!("read {DOCUMENT_PART}: {e}")))?;
        Ok(xml)
    }
}

/// Plain text from WordprocessingML: one line per paragraph, tabs and
/// breaks preserved.
pub fn plaintext_from_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Malformed(format!("bad text run: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractionError::Malformed(format!(
                    "xml error at {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }

    Ok(out)
}

#[async_trait]
impl TextExtractor for DocxAdapter {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let data = data.to_vec();
        let text = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || {
                let xml = Self::read_document_xml(&data)?;
                plaintext_from_document_xml(&xml)
            }),
        )
        .await
        .map_err(|_| ExtractionError::TimedOut)?
        .map_err(|e| ExtractionError::ExtractionFailed(format!("task join error: {e}")))??;

        let text = sanitize_extracted_text(&text);
        tracing::info!(chars = text.len(), "DOCX text extraction complete");
        Ok(text)
    }
}
