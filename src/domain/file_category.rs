use std::fmt;

/// Handling strategy for an uploaded file, selected by extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Local text layer first; falls back to cloud OCR for scans.
    Pdf,
    Docx,
    Audio,
    Image,
    Unsupported(String),
}

impl FileCategory {
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "m4a" | "mp3" => Self::Audio,
            "png" | "jpg" | "jpeg" | "gif" => Self::Image,
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Unsupported(ext) => ext,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
