//! In-process record store.
//!
//! Used when no external store is configured (history then lasts only as
//! long as the process) and by tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::{ExtractionRecord, NewExtraction};

/// Vec-backed store, newest first.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<ExtractionRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ExtractionRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, record: NewExtraction) -> Result<ExtractionRecord, StoreError> {
        let created = ExtractionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: record.user_id,
            original_filename: record.original_filename,
            extracted_text: record.extracted_text,
            confidence: record.confidence,
            created_at: Utc::now(),
        };
        self.lock().insert(0, created.clone());
        Ok(created)
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ExtractionRecord>, StoreError> {
        Ok(self
            .lock()
            .iter()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete(&self, record_id: &str) -> Result<(), StoreError> {
        let mut records = self.lock();
        match records.iter().position(|r| r.id == record_id) {
            Some(index) => {
                records.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound(record_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_extraction(user: &str, name: &str) -> NewExtraction {
        NewExtraction {
            user_id: user.to_string(),
            original_filename: name.to_string(),
            extracted_text: "text".to_string(),
            confidence: 85,
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_limited() {
        let store = MemoryRecordStore::new();
        for i in 0..12 {
            store
                .create(new_extraction("user-1", &format!("scan-{}.png", i)))
                .await
                .unwrap();
        }

        let recent = store.list_recent("user-1", 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].original_filename, "scan-11.png");
        assert_eq!(recent[9].original_filename, "scan-2.png");
    }

    #[tokio::test]
    async fn test_list_scopes_to_user() {
        let store = MemoryRecordStore::new();
        store.create(new_extraction("user-1", "mine.png")).await.unwrap();
        store.create(new_extraction("user-2", "theirs.png")).await.unwrap();

        let recent = store.list_recent("user-1", 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].original_filename, "mine.png");
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryRecordStore::new();
        let created = store.create(new_extraction("user-1", "scan.png")).await.unwrap();

        store.delete(&created.id).await.unwrap();
        assert!(store.list_recent("user-1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_record() {
        let store = MemoryRecordStore::new();
        assert!(matches!(
            store.delete("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
