//! Extract command: select, extract, persist, show history.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::helpers::{build_workflow, load_session, print_notice};
use crate::config::Settings;
use crate::intake::{FileSource, PathSource, PipedSource};
use crate::view;
use crate::workflow::ExtractStatus;

/// Run one extraction over a selected image.
pub async fn cmd_extract(
    settings: &Settings,
    file: Option<PathBuf>,
    use_stdin: bool,
    save: Option<PathBuf>,
) -> anyhow::Result<()> {
    let session = load_session(settings)?;
    let workflow = build_workflow(settings, session)?;

    let mut source: Box<dyn FileSource> = if use_stdin {
        Box::new(PipedSource::new(std::io::stdin()))
    } else {
        let path = file.ok_or_else(|| anyhow::anyhow!("provide an image path, or --stdin"))?;
        Box::new(PathSource::new(path))
    };

    tracing::info!("reading candidate from {}", source.describe());
    let candidate = source.candidate()?;
    let size = candidate.bytes.len();
    workflow.select(candidate)?;
    if let Some(name) = workflow.selected_file() {
        println!(
            "{} {} ({:.2} MB)",
            style("Selected").bold(),
            name,
            size as f64 / 1024.0 / 1024.0
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Extracting text...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let status = workflow.extract().await;
    spinner.finish_and_clear();

    match status {
        ExtractStatus::Completed => {
            if let Some(outcome) = workflow.outcome() {
                println!("{}", view::render_outcome(&outcome));
                if let Some(path) = save {
                    tokio::fs::write(&path, &outcome.text).await?;
                    println!("{} Saved text to {}", style("✓").green(), path.display());
                }
            }
            print_notice(&workflow);

            println!("{}", style("Recent extractions").bold());
            println!("{}", view::render_history(&workflow.history()));
            Ok(())
        }
        ExtractStatus::Failed => {
            let message = workflow
                .error()
                .unwrap_or_else(|| "failed to extract text from image".to_string());
            anyhow::bail!(message)
        }
        // One selection and one trigger per invocation.
        ExtractStatus::InFlight | ExtractStatus::NoSelection => {
            anyhow::bail!("nothing to extract")
        }
    }
}
