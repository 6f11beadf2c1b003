//! Workflow controller for the single extraction slot.
//!
//! Drives validator -> extraction client -> record store, and holds the
//! transient display state in between: the pending upload, the latest
//! outcome, the surfaced error, and the cached history list.
//!
//! One slot per controller. The in-flight flag guards against a second
//! extraction starting while one is running; store calls are not guarded,
//! and a stale response is applied as-is when it lands (last write to
//! local state wins, no generation check).

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::auth::Session;
use crate::intake::{validate_candidate, FileCandidate, ValidationError};
use crate::models::{ExtractionOutcome, ExtractionRecord, NewExtraction, PendingUpload};
use crate::ocr::ExtractionBackend;
use crate::store::{RecordStore, StoreError, HISTORY_LIMIT};

/// Where the extraction slot currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No pending upload, nothing in flight.
    Idle,
    /// A validated upload is waiting.
    Selected,
    /// An extraction call is in flight.
    Extracting,
}

/// What an extract trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStatus {
    /// Backend succeeded; the outcome is populated.
    Completed,
    /// Backend failed; the error is surfaced, the selection kept.
    Failed,
    /// Another extraction is already in flight; trigger ignored.
    InFlight,
    /// Nothing selected.
    NoSelection,
}

struct Inner {
    upload: Option<PendingUpload>,
    in_flight: bool,
    outcome: Option<ExtractionOutcome>,
    error: Option<String>,
    notice: Option<String>,
    history: Vec<ExtractionRecord>,
}

/// Controller over one extraction slot and its history view.
pub struct ExtractionWorkflow {
    session: Session,
    backend: Arc<dyn ExtractionBackend>,
    store: Arc<dyn RecordStore>,
    inner: Mutex<Inner>,
}

impl ExtractionWorkflow {
    pub fn new(
        session: Session,
        backend: Arc<dyn ExtractionBackend>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            session,
            backend,
            store,
            inner: Mutex::new(Inner {
                upload: None,
                in_flight: false,
                outcome: None,
                error: None,
                notice: None,
                history: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The session context this workflow acts under.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current slot state.
    pub fn state(&self) -> SlotState {
        let inner = self.lock();
        if inner.in_flight {
            SlotState::Extracting
        } else if inner.upload.is_some() {
            SlotState::Selected
        } else {
            SlotState::Idle
        }
    }

    /// Latest outcome, if any.
    pub fn outcome(&self) -> Option<ExtractionOutcome> {
        self.lock().outcome.clone()
    }

    /// Surfaced error for the current slot, if any.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Pop the transient store notice, if one is pending.
    pub fn take_notice(&self) -> Option<String> {
        self.lock().notice.take()
    }

    /// Cached history list, newest first.
    pub fn history(&self) -> Vec<ExtractionRecord> {
        self.lock().history.clone()
    }

    /// Name of the currently selected file, if any.
    pub fn selected_file(&self) -> Option<String> {
        self.lock().upload.as_ref().map(|u| u.file_name.clone())
    }

    /// Validate a candidate and make it the pending upload.
    ///
    /// On rejection the candidate is discarded and the prior selection,
    /// outcome, and error are all left untouched. On success any prior
    /// upload is replaced (releasing its preview) and outcome and error
    /// are cleared.
    pub fn select(&self, candidate: FileCandidate) -> Result<(), ValidationError> {
        validate_candidate(&candidate.mime_type, candidate.bytes.len() as u64)?;

        let mut upload =
            PendingUpload::new(candidate.file_name, candidate.mime_type, candidate.bytes);
        match upload.write_preview() {
            Ok(path) => debug!("preview written to {}", path.display()),
            Err(e) => warn!("could not write preview: {}", e),
        }

        let mut inner = self.lock();
        inner.upload = Some(upload);
        inner.outcome = None;
        inner.error = None;
        Ok(())
    }

    /// Drop the pending upload and reset the slot display state. The
    /// preview file is released with the upload.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.upload = None;
        inner.outcome = None;
        inner.error = None;
    }

    /// Run one extraction attempt over the pending upload.
    ///
    /// A trigger while a call is in flight is a no-op. On backend success
    /// the result is persisted and the history refreshed wholesale; a
    /// failed create still leaves the outcome on display, with the store
    /// error surfaced as a notice. On backend failure the error is
    /// surfaced and the selection retained for a retry.
    pub async fn extract(&self) -> ExtractStatus {
        // Claim the slot under the lock; the call itself runs outside it.
        let (file_name, mime_type, bytes) = {
            let mut inner = self.lock();
            if inner.in_flight {
                debug!("extraction already in flight, ignoring trigger");
                return ExtractStatus::InFlight;
            }
            let Some(upload) = inner.upload.as_ref() else {
                return ExtractStatus::NoSelection;
            };
            let claimed = (
                upload.file_name.clone(),
                upload.mime_type.clone(),
                upload.bytes.clone(),
            );
            inner.in_flight = true;
            inner.error = None;
            claimed
        };

        let result = self.backend.extract(&bytes, &mime_type, &file_name).await;

        match result {
            Ok(outcome) => {
                let created = self
                    .store
                    .create(NewExtraction {
                        user_id: self.session.user_id().to_string(),
                        original_filename: file_name,
                        extracted_text: outcome.text.clone(),
                        confidence: outcome.confidence,
                    })
                    .await;

                // Refresh only after a successful create; the displayed
                // outcome stands either way, even when the create failed
                // and history will not show it.
                let refreshed = match &created {
                    Ok(_) => Some(self.list_recent().await),
                    Err(_) => None,
                };

                let mut inner = self.lock();
                inner.in_flight = false;
                inner.outcome = Some(outcome);
                match created {
                    Ok(record) => debug!("stored extraction record {}", record.id),
                    Err(e) => inner.notice = Some(e.to_string()),
                }
                match refreshed {
                    Some(Ok(records)) => inner.history = records,
                    Some(Err(e)) => inner.notice = Some(e.to_string()),
                    None => {}
                }
                ExtractStatus::Completed
            }
            Err(e) => {
                let mut inner = self.lock();
                inner.in_flight = false;
                inner.error = Some(e.to_string());
                ExtractStatus::Failed
            }
        }
    }

    /// Replace the cached history wholesale from the store.
    pub async fn refresh_history(&self) -> Result<(), StoreError> {
        let records = self.list_recent().await?;
        self.lock().history = records;
        Ok(())
    }

    /// Delete a record and, on success, refresh the history wholesale.
    ///
    /// A failed delete leaves the cached list unchanged. A failed refresh
    /// after a successful delete is surfaced as a notice.
    pub async fn delete(&self, record_id: &str) -> Result<(), StoreError> {
        self.store.delete(record_id).await?;

        match self.list_recent().await {
            Ok(records) => self.lock().history = records,
            Err(e) => self.lock().notice = Some(e.to_string()),
        }
        Ok(())
    }

    /// Copy a stored record's text and confidence into the slot for
    /// viewing. Does not re-run extraction. Returns false when the record
    /// is not in the cached history.
    pub fn view(&self, record_id: &str) -> bool {
        let mut inner = self.lock();
        let Some(record) = inner.history.iter().find(|r| r.id == record_id) else {
            return false;
        };
        let outcome = ExtractionOutcome {
            text: record.extracted_text.clone(),
            confidence: record.confidence,
        };
        inner.outcome = Some(outcome);
        true
    }

    /// Amend the displayed outcome's text in place. Never touches the
    /// persisted record.
    pub fn amend_text(&self, text: String) {
        let mut inner = self.lock();
        if let Some(outcome) = inner.outcome.as_mut() {
            outcome.text = text;
        }
    }

    async fn list_recent(&self) -> Result<Vec<ExtractionRecord>, StoreError> {
        self.store
            .list_recent(self.session.user_id(), HISTORY_LIMIT)
            .await
    }
}
