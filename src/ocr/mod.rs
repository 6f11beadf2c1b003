//! Extraction client for the hosted OCR endpoint.
//!
//! One multipart request per attempt, no retries. The caller decides what
//! to do with a failure.

mod client;

pub use client::{
    ExtractionBackend, ExtractionError, OcrClient, CONFIDENCE_WITHOUT_OVERLAY,
    CONFIDENCE_WITH_OVERLAY, DEFAULT_ENDPOINT, DEFAULT_LANGUAGE,
};
