#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockType {
    Page,
    Line,
    Word,
    Other(String),
}

impl BlockType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "PAGE" => Self::Page,
            "LINE" => Self::Line,
            "WORD" => Self::Word,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedBlock {
    pub block_type: BlockType,
    pub text: Option<String>,
}

impl RecognizedBlock {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            block_type: BlockType::Line,
            text: Some(text.into()),
        }
    }

    pub fn line_text(&self) -> Option<&str> {
        match self.block_type {
            BlockType::Line => self.text.as_deref(),
            _ => None,
        }
    }
}

/// Texts of all `LINE` blocks, in backend order.
pub fn line_texts(blocks: &[RecognizedBlock]) -> impl Iterator<Item = &str> {
    blocks.iter().filter_map(RecognizedBlock::line_text)
}
