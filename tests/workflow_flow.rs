//! End-to-end workflow tests.
//!
//! Drives intake -> validation -> extraction -> store -> history view
//! through the public API, with a scripted backend standing in for the
//! hosted OCR endpoint and the in-process store standing in for the
//! managed row store.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;

use textlens::auth::{AuthUser, Session};
use textlens::intake::{FileSource, PipedSource};
use textlens::models::ExtractionOutcome;
use textlens::ocr::{ExtractionBackend, ExtractionError};
use textlens::store::{MemoryRecordStore, RecordStore};
use textlens::view::{render_history, Intent};
use textlens::workflow::{ExtractStatus, ExtractionWorkflow, SlotState};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

struct FixedBackend {
    text: String,
    confidence: u8,
}

#[async_trait]
impl ExtractionBackend for FixedBackend {
    async fn extract(
        &self,
        _image: &[u8],
        _mime_type: &str,
        _file_name: &str,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        Ok(ExtractionOutcome {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

fn session() -> Session {
    Session::from_grant(
        "token".to_string(),
        None,
        3600,
        AuthUser {
            id: "user-1".to_string(),
            email: Some("a@example.com".to_string()),
        },
    )
}

#[tokio::test]
async fn pasted_bytes_flow_end_to_end() {
    let store = Arc::new(MemoryRecordStore::new());
    let workflow = ExtractionWorkflow::new(
        session(),
        Arc::new(FixedBackend {
            text: "extracted from paste".to_string(),
            confidence: 85,
        }),
        store.clone(),
    );

    // Paste path: sniffed type, synthesized name, same validation gate.
    let mut data = PNG_MAGIC.to_vec();
    data.extend_from_slice(&[0u8; 32]);
    let candidate = PipedSource::new(Cursor::new(data)).candidate().unwrap();
    assert_eq!(candidate.mime_type, "image/png");

    workflow.select(candidate).unwrap();
    assert_eq!(workflow.state(), SlotState::Selected);

    assert_eq!(workflow.extract().await, ExtractStatus::Completed);
    assert_eq!(workflow.outcome().unwrap().text, "extracted from paste");

    // Persisted under the session's user and visible in the refreshed view.
    let history = workflow.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, "user-1");
    assert_eq!(history[0].original_filename, "pasted.png");

    let rendered = render_history(&history);
    assert!(rendered.contains("pasted.png"));
    assert!(rendered.contains("85% confidence"));
}

#[tokio::test]
async fn history_intents_round_trip() {
    let store = Arc::new(MemoryRecordStore::new());
    let workflow = ExtractionWorkflow::new(
        session(),
        Arc::new(FixedBackend {
            text: "first".to_string(),
            confidence: 95,
        }),
        store.clone(),
    );

    let mut data = PNG_MAGIC.to_vec();
    data.extend_from_slice(&[0u8; 8]);
    let candidate = PipedSource::new(Cursor::new(data)).candidate().unwrap();
    workflow.select(candidate).unwrap();
    workflow.extract().await;

    let record_id = workflow.history()[0].id.clone();

    // View intent copies stored values into the slot without another call.
    workflow.clear();
    workflow.refresh_history().await.unwrap();
    match Intent::View(record_id.clone()) {
        Intent::View(id) => assert!(workflow.view(&id)),
        Intent::Delete(_) => unreachable!(),
    }
    assert_eq!(workflow.outcome().unwrap().confidence, 95);

    // Delete intent removes the record and refreshes the list.
    match Intent::Delete(record_id) {
        Intent::Delete(id) => workflow.delete(&id).await.unwrap(),
        Intent::View(_) => unreachable!(),
    }
    assert!(workflow.history().is_empty());
    assert!(store.list_recent("user-1", 10).await.unwrap().is_empty());
}
