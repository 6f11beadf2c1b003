//! REST adapter for the hosted row store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use super::{RecordStore, StoreError};
use crate::auth::Session;
use crate::models::{ExtractionRecord, NewExtraction};

/// Table holding extraction records.
const RESULTS_TABLE: &str = "ocr_results";

/// Adapter speaking the store's REST dialect: equality filters as query
/// parameters, descending order on `created_at`, bearer token plus api
/// key on every request.
pub struct RestRecordStore {
    base_url: String,
    api_key: String,
    access_token: String,
    client: Client,
}

impl RestRecordStore {
    /// Create an adapter bound to one session's credential.
    pub fn new(base_url: &str, api_key: &str, session: &Session, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: session.access_token.clone(),
            client,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, RESULTS_TABLE)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Rejected(format!("HTTP {}: {}", status, body)))
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn create(&self, record: NewExtraction) -> Result<ExtractionRecord, StoreError> {
        let resp = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let resp = Self::check(resp).await?;

        // The store answers an insert with the array of created rows.
        let mut rows: Vec<ExtractionRecord> = resp
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        debug!("created extraction record for {}", record.original_filename);
        rows.pop()
            .ok_or_else(|| StoreError::Parse("insert returned no rows".to_string()))
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ExtractionRecord>, StoreError> {
        let user_filter = format!("eq.{}", user_id);
        let limit_param = limit.to_string();

        let resp = self
            .authed(self.client.get(self.table_url()).query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", "created_at.desc"),
                ("limit", limit_param.as_str()),
            ]))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let resp = Self::check(resp).await?;

        resp.json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn delete(&self, record_id: &str) -> Result<(), StoreError> {
        let id_filter = format!("eq.{}", record_id);

        let resp = self
            .authed(
                self.client
                    .delete(self.table_url())
                    .query(&[("id", id_filter.as_str())]),
            )
            // Ask for the deleted rows back so a no-match is detectable.
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let resp = Self::check(resp).await?;

        let rows: Vec<ExtractionRecord> = resp
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(record_id.to_string()));
        }
        debug!("deleted extraction record {}", record_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    fn adapter() -> RestRecordStore {
        let session = Session::from_grant(
            "token".to_string(),
            None,
            3600,
            AuthUser {
                id: "user-1".to_string(),
                email: None,
            },
        );
        RestRecordStore::new("https://store.example.com/", "anon-key", &session, 30)
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        assert_eq!(
            adapter().table_url(),
            "https://store.example.com/rest/v1/ocr_results"
        );
    }

    #[test]
    fn test_list_response_deserializes() {
        let json = r#"[
            {"id": "b", "user_id": "user-1", "original_filename": "two.png",
             "extracted_text": "later", "confidence": 95,
             "created_at": "2026-08-05T11:00:00+00:00"},
            {"id": "a", "user_id": "user-1", "original_filename": "one.png",
             "extracted_text": "earlier", "confidence": 85,
             "created_at": "2026-08-05T10:00:00+00:00"}
        ]"#;

        let rows: Vec<ExtractionRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "b");
        assert!(rows[0].created_at > rows[1].created_at);
    }
}
