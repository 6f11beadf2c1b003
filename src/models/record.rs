//! Extraction result models.
//!
//! Records are owned by the external row store; the workflow only ever
//! holds read-only copies for display. A new extraction always creates a
//! new record, records are never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted result of one successful text extraction, tied to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Filename of the uploaded image.
    pub original_filename: String,
    /// Extracted text, possibly empty.
    pub extracted_text: String,
    /// Confidence value, 0-100.
    pub confidence: u8,
    /// When the record was created by the store.
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new extraction record.
///
/// The store assigns `id` and `created_at` on insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewExtraction {
    pub user_id: String,
    pub original_filename: String,
    pub extracted_text: String,
    pub confidence: u8,
}

/// Transient result of one extraction attempt.
///
/// Lives in workflow state until replaced by the next attempt or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Extracted text, possibly empty.
    pub text: String,
    /// Derived confidence value, 0-100.
    pub confidence: u8,
}
