//! File intake: input sources and candidate validation.
//!
//! Explicit selection and pasted/piped bytes both reduce to a
//! [`FileCandidate`], and every candidate goes through the same
//! [`validate_candidate`] check before it may become the pending upload.

mod source;
mod validate;

pub use source::{FileCandidate, FileSource, IntakeError, PathSource, PipedSource};
pub use validate::{validate_candidate, ValidationError, ALLOWED_MIME_TYPES, MAX_FILE_SIZE};
