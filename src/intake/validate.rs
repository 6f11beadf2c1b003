//! Candidate validation: MIME allow-list and size ceiling.

use thiserror::Error;

/// MIME types accepted for extraction.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
];

/// Maximum accepted file size in bytes (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// A candidate failed validation. User-correctable; nothing else happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a supported image type (use JPEG, PNG, GIF, or BMP)")]
    UnsupportedType(String),
    #[error("file is {0} bytes; images must be 10 MiB or smaller")]
    TooLarge(u64),
}

/// Check a candidate's declared MIME type and byte size.
///
/// A rejection carries no side effects: the caller discards the candidate
/// and leaves any prior selection untouched.
pub fn validate_candidate(mime_type: &str, size: u64) -> Result<(), ValidationError> {
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(ValidationError::UnsupportedType(mime_type.to_string()));
    }
    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge(size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_types() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_candidate(mime, 1024).is_ok(), "rejected {}", mime);
        }
    }

    #[test]
    fn test_rejects_disallowed_types() {
        for mime in ["application/pdf", "image/webp", "text/plain", "image/svg+xml"] {
            assert_eq!(
                validate_candidate(mime, 1024),
                Err(ValidationError::UnsupportedType(mime.to_string()))
            );
        }
    }

    #[test]
    fn test_size_ceiling_is_inclusive() {
        assert!(validate_candidate("image/png", MAX_FILE_SIZE).is_ok());
        assert_eq!(
            validate_candidate("image/png", MAX_FILE_SIZE + 1),
            Err(ValidationError::TooLarge(MAX_FILE_SIZE + 1))
        );
    }

    #[test]
    fn test_type_checked_before_size() {
        // Both constraints violated: the type failure is the one reported.
        assert_eq!(
            validate_candidate("application/zip", MAX_FILE_SIZE + 1),
            Err(ValidationError::UnsupportedType("application/zip".to_string()))
        );
    }
}
