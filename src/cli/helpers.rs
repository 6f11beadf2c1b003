//! Shared helper functions for CLI commands.

use std::sync::Arc;

use console::style;

use crate::auth::{AuthClient, AuthError, Session};
use crate::config::Settings;
use crate::ocr::OcrClient;
use crate::store::{MemoryRecordStore, RecordStore, RestRecordStore};
use crate::workflow::ExtractionWorkflow;

/// Load the persisted session, failing with a pointer to `login` when
/// there is none or it has lapsed.
pub fn load_session(settings: &Settings) -> anyhow::Result<Session> {
    let session =
        Session::load(&settings.session_path()).ok_or(AuthError::SignedOut)?;
    if session.is_expired() {
        return Err(AuthError::Expired.into());
    }
    Ok(session)
}

/// Build the identity provider client from settings.
pub fn auth_client(settings: &Settings) -> anyhow::Result<AuthClient> {
    let url = settings.store.url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("no identity provider configured; set STORE_URL or store.url")
    })?;
    let api_key = settings.store.api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!("no store api key configured; set STORE_API_KEY or store.api_key")
    })?;
    Ok(AuthClient::new(url, api_key, settings.request_timeout))
}

/// Assemble the extraction workflow for one session.
pub fn build_workflow(
    settings: &Settings,
    session: Session,
) -> anyhow::Result<ExtractionWorkflow> {
    let api_key = settings.ocr.api_key.clone().ok_or_else(|| {
        anyhow::anyhow!("no OCR api key configured; set OCR_API_KEY or ocr.api_key")
    })?;
    let backend = OcrClient::new(
        settings.ocr.endpoint.clone(),
        api_key,
        settings.ocr.language.clone(),
        settings.request_timeout,
    );

    let store: Arc<dyn RecordStore> = match (&settings.store.url, &settings.store.api_key) {
        (Some(url), Some(api_key)) => {
            Arc::new(RestRecordStore::new(url, api_key, &session, settings.request_timeout))
        }
        _ => {
            println!(
                "{} No store configured; history will not outlive this run",
                style("!").yellow()
            );
            Arc::new(MemoryRecordStore::new())
        }
    };

    Ok(ExtractionWorkflow::new(session, Arc::new(backend), store))
}

/// Print a transient store notice, if the workflow holds one.
pub fn print_notice(workflow: &ExtractionWorkflow) {
    if let Some(notice) = workflow.take_notice() {
        println!("{} {}", style("!").yellow(), notice);
    }
}
