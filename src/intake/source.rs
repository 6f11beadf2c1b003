//! Input sources that produce candidate files.
//!
//! Whether an image arrives by explicit path selection or as bytes piped
//! on stdin (the paste path), the result is the same candidate shape fed
//! to the same validation entry point.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// A candidate file produced by an input source, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Filename, real or synthesized.
    pub file_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// An input source failed to produce a candidate.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("failed to read {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read piped input: {0}")]
    Pipe(#[source] std::io::Error),
    #[error("piped input was empty")]
    EmptyInput,
    #[error("could not determine an image type for the piped input")]
    UnknownType,
}

/// Something that can produce one candidate file.
pub trait FileSource {
    /// Label for log messages.
    fn describe(&self) -> String;

    /// Produce the candidate. Consumes the source's input.
    fn candidate(&mut self) -> Result<FileCandidate, IntakeError>;
}

/// Explicit selection of a file by path.
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Declared type from the filename, the way a browser reports it.
    fn declared_mime(path: &Path) -> String {
        mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    }
}

impl FileSource for PathSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn candidate(&mut self) -> Result<FileCandidate, IntakeError> {
        let bytes = std::fs::read(&self.path).map_err(|source| IntakeError::Io {
            path: self.path.clone(),
            source,
        })?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = Self::declared_mime(&self.path);

        debug!(
            "selected {} ({}, {} bytes)",
            file_name,
            mime_type,
            bytes.len()
        );
        Ok(FileCandidate {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// Bytes piped from a reader, typically stdin. The paste path.
///
/// There is no declared type or filename for pasted bytes, so the type is
/// sniffed from content and the name synthesized from it.
pub struct PipedSource<R: Read> {
    reader: R,
}

impl<R: Read> PipedSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> FileSource for PipedSource<R> {
    fn describe(&self) -> String {
        "piped input".to_string()
    }

    fn candidate(&mut self) -> Result<FileCandidate, IntakeError> {
        let mut bytes = Vec::new();
        self.reader
            .read_to_end(&mut bytes)
            .map_err(IntakeError::Pipe)?;

        if bytes.is_empty() {
            return Err(IntakeError::EmptyInput);
        }

        let kind = infer::get(&bytes).ok_or(IntakeError::UnknownType)?;
        let file_name = format!("pasted.{}", kind.extension());

        debug!(
            "piped {} bytes, sniffed as {}",
            bytes.len(),
            kind.mime_type()
        );
        Ok(FileCandidate {
            file_name,
            mime_type: kind.mime_type().to_string(),
            bytes,
        })
    }
}
