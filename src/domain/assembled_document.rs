pub const NAME_LABEL: &str = "DOCUMENT NAME: ";
pub const CONTENT_OPEN: &str = "CONTENT: [";
pub const CONTENT_CLOSE: &str = "]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub filename: String,
    pub content: String,
}

/// Per-file extraction results in submission order, rendered as a single
/// labelled text blob for the generative backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledDocument {
    entries: Vec<DocumentEntry>,
}

impl AssembledDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filename: impl Into<String>, content: impl Into<String>) {
        self.entries.push(DocumentEntry {
            filename: filename.into(),
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{NAME_LABEL}{}\n{CONTENT_OPEN}{}{CONTENT_CLOSE}",
                    entry.filename, entry.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
