//! Uploaded files.
//!
//! Files live in a flat namespace under a fixed prefix. The file name is the
//! natural key: uploading a second file with the same name replaces the first.

use crate::domain::foundation::ValidationError;

/// A listed file together with a freshly resolved download URL.
///
/// The URL is resolved on every listing and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub name: String,
    pub download_url: String,
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// Creates an upload from the file's own name and contents.
    ///
    /// The name becomes a single path segment, so it may not be empty or
    /// contain `/`.
    pub fn new(
        name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::empty_field("file_name"));
        }
        if name.contains('/') {
            return Err(ValidationError::invalid_format("file_name", "contains '/'"));
        }
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Full object path of a named file under `prefix`.
pub fn object_path(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), name)
}

/// Last segment of an object path.
pub fn object_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_keeps_name_and_bytes() {
        let upload =
            FileUpload::new("a.txt", Some("text/plain".to_string()), b"hi".to_vec()).unwrap();
        assert_eq!(upload.name(), "a.txt");
        assert_eq!(upload.content_type(), Some("text/plain"));
        assert_eq!(upload.bytes(), b"hi");
    }

    #[test]
    fn upload_rejects_empty_name() {
        assert!(FileUpload::new("", None, vec![]).is_err());
    }

    #[test]
    fn upload_rejects_nested_name() {
        assert!(FileUpload::new("dir/a.txt", None, vec![]).is_err());
    }

    #[test]
    fn object_path_joins_prefix_and_name() {
        assert_eq!(object_path("projectFiles", "a.txt"), "projectFiles/a.txt");
        assert_eq!(object_path("projectFiles/", "a.txt"), "projectFiles/a.txt");
    }

    #[test]
    fn object_name_takes_last_segment() {
        assert_eq!(object_name("projectFiles/a.txt"), "a.txt");
        assert_eq!(object_name("a.txt"), "a.txt");
    }
}
