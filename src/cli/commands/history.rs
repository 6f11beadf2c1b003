//! History commands: list, view, delete.

use console::style;

use crate::cli::helpers::{build_workflow, load_session, print_notice};
use crate::config::Settings;
use crate::view::{self, Intent};

/// Show the most recent extractions.
pub async fn cmd_history(settings: &Settings) -> anyhow::Result<()> {
    let session = load_session(settings)?;
    let workflow = build_workflow(settings, session)?;

    workflow.refresh_history().await?;
    println!("{}", view::render_history(&workflow.history()));
    Ok(())
}

/// Apply a history view intent against the workflow.
pub async fn cmd_intent(settings: &Settings, intent: Intent) -> anyhow::Result<()> {
    let session = load_session(settings)?;
    let workflow = build_workflow(settings, session)?;

    workflow.refresh_history().await?;

    match intent {
        Intent::View(record_id) => {
            if !workflow.view(&record_id) {
                anyhow::bail!("no record {} in the recent history", record_id);
            }
            if let Some(outcome) = workflow.outcome() {
                println!("{}", view::render_outcome(&outcome));
            }
        }
        Intent::Delete(record_id) => {
            workflow.delete(&record_id).await?;
            print_notice(&workflow);
            println!("{} Deleted {}", style("✓").green(), record_id);
            println!("{}", view::render_history(&workflow.history()));
        }
    }
    Ok(())
}
