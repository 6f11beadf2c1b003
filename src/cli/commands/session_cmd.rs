//! Session commands: login, logout, whoami.

use console::{style, Term};

use crate::auth::Session;
use crate::cli::helpers::{auth_client, load_session};
use crate::config::Settings;

/// Sign in and persist the session context.
pub async fn cmd_login(
    settings: &Settings,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let client = auth_client(settings)?;

    let password = match password {
        Some(p) => p,
        None => {
            let term = Term::stderr();
            term.write_str("Password: ")?;
            term.read_secure_line()?
        }
    };

    let session = client.sign_in(email, &password).await?;

    settings.ensure_directories()?;
    session.save(&settings.session_path())?;

    println!(
        "{} Signed in as {}",
        style("✓").green(),
        session.user.email.as_deref().unwrap_or(email)
    );
    Ok(())
}

/// Revoke the token and remove the persisted session.
pub async fn cmd_logout(settings: &Settings) -> anyhow::Result<()> {
    let path = settings.session_path();
    let Some(session) = Session::load(&path) else {
        println!("{} Not signed in", style("!").yellow());
        return Ok(());
    };

    // Local teardown happens even when the provider refuses the revocation.
    if let Ok(client) = auth_client(settings) {
        if let Err(e) = client.sign_out(&session).await {
            tracing::warn!("token revocation failed: {}", e);
        }
    }
    Session::remove(&path)?;

    println!("{} Signed out", style("✓").green());
    Ok(())
}

/// Show the signed-in user.
pub async fn cmd_whoami(settings: &Settings) -> anyhow::Result<()> {
    let session = load_session(settings)?;

    println!(
        "{} ({})",
        session.user.email.as_deref().unwrap_or("<no email>"),
        session.user_id()
    );
    println!("session expires {}", session.expires_at.format("%b %d, %Y %H:%M"));
    Ok(())
}
