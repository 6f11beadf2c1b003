//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod extract;
mod history;
mod init;
mod session_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::view::Intent;

#[derive(Parser)]
#[command(name = "textlens")]
#[command(about = "Image-to-text extraction with per-user history")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides config file; the session lives here).
    #[arg(long, short = 't', global = true)]
    target: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and a starter config file
    Init,

    /// Sign in and establish a session
    Login {
        /// Email address to sign in with
        email: String,
        /// Password (prompted for when omitted)
        #[arg(short, long, env = "TEXTLENS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Tear down the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Extract text from an image and store the result
    Extract {
        /// Image file to read (omit when using --stdin)
        file: Option<PathBuf>,
        /// Read pasted or piped image bytes from stdin
        #[arg(long)]
        stdin: bool,
        /// Write the extracted text to a file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Show the most recent extractions
    History,

    /// Load a stored extraction back into view
    View {
        /// Record id (as shown by `history`)
        record_id: String,
    },

    /// Delete a stored extraction
    Delete {
        /// Record id (as shown by `history`)
        record_id: String,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, _config) = load_settings_with_options(LoadOptions {
        config_path: cli.config.clone(),
        use_cwd: cli.cwd,
        data: cli.target.clone(),
    })
    .await;

    if let Err(e) = settings.validate() {
        anyhow::bail!(e);
    }

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Login { email, password } => {
            session_cmd::cmd_login(&settings, &email, password).await
        }
        Commands::Logout => session_cmd::cmd_logout(&settings).await,
        Commands::Whoami => session_cmd::cmd_whoami(&settings).await,
        Commands::Extract { file, stdin, save } => {
            extract::cmd_extract(&settings, file, stdin, save).await
        }
        Commands::History => history::cmd_history(&settings).await,
        Commands::View { record_id } => {
            history::cmd_intent(&settings, Intent::View(record_id)).await
        }
        Commands::Delete { record_id } => {
            history::cmd_intent(&settings, Intent::Delete(record_id)).await
        }
    }
}
