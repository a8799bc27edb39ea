use std::fmt;

/// Address of an object in the storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// `<folder>/<filename>`; an empty folder yields the bare filename.
    pub fn key_for(folder: &str, filename: &str) -> String {
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            filename.to_string()
        } else {
            format!("{folder}/{filename}")
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
