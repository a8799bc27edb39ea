use bytes::Bytes;

use super::file_category::FileCategory;

/// A file received by the upload layer, held in memory for the lifetime of
/// one request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub stored_name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: String, data: Bytes) -> Self {
        let extension = extension_of(&filename);
        let stored_name = stored_name_for(&filename, chrono::Utc::now().timestamp_millis());
        Self {
            size_bytes: data.len() as u64,
            filename,
            stored_name,
            extension,
            data,
        }
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_extension(&self.extension)
    }
}

/// Lowercased text after the final `.`. A name without a dot yields the
/// whole name.
pub fn extension_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// `<stem>-<millis>.<ext>`, the name the upload is known by in logs.
pub fn stored_name_for(filename: &str, millis: i64) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{millis}.{ext}"),
        None => format!("{filename}-{millis}"),
    }
}
