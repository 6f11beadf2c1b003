//! HTTP client for the hosted OCR parse endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::ExtractionOutcome;

/// Default hosted parse endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.ocr.space/parse/image";

/// Default recognition language.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Confidence reported when the endpoint's result carries an overlay.
///
/// The endpoint does not return a measured confidence; these two fixed
/// values stand in for one.
pub const CONFIDENCE_WITH_OVERLAY: u8 = 95;

/// Confidence reported when no overlay is present.
pub const CONFIDENCE_WITHOUT_OVERLAY: u8 = 85;

/// Errors from one extraction attempt. All are terminal for that attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The endpoint flagged the upload as unprocessable; carries its
    /// message verbatim.
    #[error("{0}")]
    Processing(String),
    /// The request itself failed.
    #[error("extraction request failed: {0}")]
    Connection(String),
    /// The endpoint answered with something other than the parse payload.
    #[error("malformed extraction response: {0}")]
    Parse(String),
}

/// Parse endpoint response format.
#[derive(Debug, Deserialize)]
pub(crate) struct ParseResponse {
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
    #[serde(rename = "TextOverlay")]
    text_overlay: Option<TextOverlay>,
}

#[derive(Debug, Deserialize)]
struct TextOverlay {
    #[serde(rename = "HasOverlay", default)]
    has_overlay: bool,
}

impl ParseResponse {
    /// Normalize the payload into an outcome, honoring the error flag.
    fn into_outcome(self) -> Result<ExtractionOutcome, ExtractionError> {
        if self.is_errored_on_processing {
            return Err(ExtractionError::Processing(
                self.error_message
                    .unwrap_or_else(|| "OCR processing failed".to_string()),
            ));
        }

        let first = self.parsed_results.into_iter().next();
        let confidence = match first.as_ref().and_then(|r| r.text_overlay.as_ref()) {
            Some(overlay) if overlay.has_overlay => CONFIDENCE_WITH_OVERLAY,
            _ => CONFIDENCE_WITHOUT_OVERLAY,
        };
        let text = first.map(|r| r.parsed_text).unwrap_or_default();

        Ok(ExtractionOutcome { text, confidence })
    }
}

/// Backend that turns image bytes into an extraction outcome.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Run one extraction attempt over the given image.
    async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<ExtractionOutcome, ExtractionError>;
}

/// Client for the hosted OCR endpoint.
pub struct OcrClient {
    endpoint: String,
    api_key: String,
    language: String,
    client: Client,
}

impl OcrClient {
    /// Create a new client.
    pub fn new(endpoint: String, api_key: String, language: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            language,
            client,
        }
    }
}

#[async_trait]
impl ExtractionBackend for OcrClient {
    async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let file_part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| ExtractionError::Connection(format!("invalid upload part: {}", e)))?;

        // Fixed processing options: no overlay, no orientation detection,
        // no table mode, scale to fit.
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("apikey", self.api_key.clone())
            .text("language", self.language.clone())
            .text("isOverlayRequired", "false")
            .text("detectOrientation", "false")
            .text("isTable", "false")
            .text("scale", "true");

        debug!("posting {} ({} bytes) to {}", file_name, image.len(), self.endpoint);
        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ExtractionError::Connection(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: ParseResponse = resp
            .json()
            .await
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        parsed.into_outcome()
    }
}
