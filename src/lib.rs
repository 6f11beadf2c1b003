//! textlens - image-to-text extraction with per-user history.
//!
//! A thin client around a hosted OCR endpoint, a managed row store, and a
//! hosted identity provider: validate a selected image, send one multipart
//! extraction request, persist the result for the signed-in user, and keep
//! a short history in view.

pub mod auth;
pub mod cli;
pub mod config;
pub mod intake;
pub mod models;
pub mod ocr;
pub mod store;
pub mod view;
pub mod workflow;
