//! Data models for textlens.

mod record;
mod upload;

pub use record::{ExtractionOutcome, ExtractionRecord, NewExtraction};
pub use upload::PendingUpload;
