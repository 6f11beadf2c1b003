//! Result store adapters for the external row store.
//!
//! Records live in the managed store and are scoped to the authenticated
//! user; ownership enforcement is the store's access rules, not ours.
//! `create` and `list_recent` are deliberately uncoupled: to observe a
//! write, re-list.

mod memory;
mod rest;

pub use memory::MemoryRecordStore;
pub use rest::RestRecordStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ExtractionRecord, NewExtraction};

/// History entries fetched for the view.
pub const HISTORY_LIMIT: usize = 10;

/// Errors from store operations. Terminal for the one call that raised
/// them; surfaced as transient notices, never fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Connection(String),
    #[error("store rejected the request: {0}")]
    Rejected(String),
    #[error("malformed store response: {0}")]
    Parse(String),
    #[error("no such record: {0}")]
    NotFound(String),
}

/// Persistence operations for extraction records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record, returning it as the store materialized it.
    async fn create(&self, record: NewExtraction) -> Result<ExtractionRecord, StoreError>;

    /// Fetch the user's records, newest first, at most `limit`.
    async fn list_recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ExtractionRecord>, StoreError>;

    /// Delete a record by id.
    async fn delete(&self, record_id: &str) -> Result<(), StoreError>;
}
