//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod music;

pub use job::JobCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Look up the current track and print the music field
    Fetch {
        /// Behave like the automatic refresh on page load: keep a filled field
        #[arg(long)]
        on_init: bool,

        /// Text already present in the music field
        #[arg(long)]
        current: Option<String>,
    },
    /// Low-level job operations
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Fetch { on_init, current } => {
            music::fetch_current_music(config, on_init, current).await
        }
        Commands::Job { command } => job::handle_job_command(command, config).await,
    }
}
