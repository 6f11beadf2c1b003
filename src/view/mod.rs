//! History view rendering.
//!
//! Pure presentation over the workflow's history list and current slot.
//! The only feedback channels are the two [`Intent`] values handed back
//! to the workflow.

use console::style;

use crate::models::{ExtractionOutcome, ExtractionRecord};

/// Actions the history view can request from the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Copy a stored record's text and confidence into the current slot.
    View(String),
    /// Remove a record.
    Delete(String),
}

/// Characters of extracted text shown per history entry.
const SNIPPET_LEN: usize = 100;

/// Render the history list, newest first.
pub fn render_history(records: &[ExtractionRecord]) -> String {
    if records.is_empty() {
        return "No extractions yet. Upload an image to get started!".to_string();
    }

    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{}  {}\n",
            style(&record.id).dim(),
            style(&record.original_filename).bold(),
        ));
        out.push_str(&format!(
            "    {}  {}% confidence\n",
            record.created_at.format("%b %d, %Y %H:%M"),
            record.confidence,
        ));
        let snippet = snippet(&record.extracted_text);
        if !snippet.is_empty() {
            out.push_str(&format!("    {}\n", style(snippet).dim()));
        }
    }
    out
}

/// Render the current slot's outcome.
pub fn render_outcome(outcome: &ExtractionOutcome) -> String {
    let header = format!(
        "{} ({}% confidence)",
        style("Extracted Text").green().bold(),
        outcome.confidence,
    );
    if outcome.text.is_empty() {
        format!("{}\n{}\n", header, style("(no text found)").dim())
    } else {
        format!("{}\n{}\n", header, outcome.text)
    }
}

/// First line of text, truncated to `SNIPPET_LEN` characters.
fn snippet(text: &str) -> String {
    let flattened: String = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut truncated: String = flattened.chars().take(SNIPPET_LEN).collect();
    if flattened.chars().count() > SNIPPET_LEN {
        truncated.push_str("...");
    }
    truncated
}
