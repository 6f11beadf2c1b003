//! The pending upload held between file selection and extraction.

use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

/// A selected, validated image waiting for extraction.
///
/// Client-local and transient: it exists between selection and either a
/// successful extraction or explicit clearing, and is never persisted.
/// Dropping it deletes the preview file, so releasing the preview is tied
/// to selection change and workflow teardown.
#[derive(Debug)]
pub struct PendingUpload {
    /// Filename as selected, stored with the record on success.
    pub file_name: String,
    /// Declared MIME type of the selection.
    pub mime_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// SHA-256 of the image bytes.
    pub content_hash: String,
    preview: Option<NamedTempFile>,
}

impl PendingUpload {
    /// Wrap a validated selection.
    pub fn new(file_name: String, mime_type: String, bytes: Vec<u8>) -> Self {
        let content_hash = Self::compute_hash(&bytes);
        Self {
            file_name,
            mime_type,
            bytes,
            content_hash,
            preview: None,
        }
    }

    /// Compute SHA-256 hash of content.
    pub fn compute_hash(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }

    /// Size of the selection in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Write the preview file if not already written, returning its path.
    ///
    /// The file lives until this upload is dropped.
    pub fn write_preview(&mut self) -> std::io::Result<&Path> {
        match &mut self.preview {
            Some(file) => Ok(file.path()),
            preview @ None => {
                let mut file = tempfile::Builder::new()
                    .prefix(&format!("textlens-{}-", &self.content_hash[..8]))
                    .tempfile()?;
                file.write_all(&self.bytes)?;
                file.flush()?;
                Ok(preview.insert(file).path())
            }
        }
    }

    /// Path of the preview file, if one has been written.
    pub fn preview_path(&self) -> Option<&Path> {
        self.preview.as_ref().map(|f| f.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        let hash = PendingUpload::compute_hash(b"Hello, World!");
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex chars
    }

    #[test]
    fn test_new_fills_hash_and_size() {
        let upload = PendingUpload::new(
            "scan.png".to_string(),
            "image/png".to_string(),
            vec![1, 2, 3],
        );
        assert_eq!(upload.size(), 3);
        assert_eq!(upload.content_hash, PendingUpload::compute_hash(&[1, 2, 3]));
        assert!(upload.preview_path().is_none());
    }

    #[test]
    fn test_preview_written_once_and_released_on_drop() {
        let mut upload = PendingUpload::new(
            "scan.png".to_string(),
            "image/png".to_string(),
            b"not really an image".to_vec(),
        );

        let first = upload.write_preview().unwrap().to_path_buf();
        assert!(first.exists());
        assert_eq!(std::fs::read(&first).unwrap(), upload.bytes);

        // Second call reuses the same file.
        let second = upload.write_preview().unwrap().to_path_buf();
        assert_eq!(first, second);

        drop(upload);
        assert!(!first.exists());
    }
}
