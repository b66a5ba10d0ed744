//! Job command handlers
//!
//! Direct access to the job endpoints: submit a lookup, check a handle
//! once, or poll an existing handle until it finishes.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use nowplaying_client::{JobClient, MusicField, SessionEnd, deliver_to};
use nowplaying_core::domain::job::{JobHandle, JobOutcome, PollResult};
use nowplaying_core::dto::job::SubmitParams;
use std::sync::Arc;
use tracing::info;

use super::music::{error_sink, print_field};
use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Submit a lookup job and print its handle
    Submit {
        /// Extra form fields as key=value
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// Check the status of a job once
    Status {
        /// Job handle
        handle: String,
    },
    /// Poll a job until it finishes (Ctrl-C cancels)
    Watch {
        /// Job handle
        handle: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    match command {
        JobCommands::Submit { params } => submit_job(config, params).await,
        JobCommands::Status { handle } => {
            let client = config.job_client()?;
            job_status(&client, JobHandle::new(handle)).await
        }
        JobCommands::Watch { handle } => watch_job(config, JobHandle::new(handle)).await,
    }
}

/// Submit a lookup job
async fn submit_job(config: &Config, extra: Vec<(String, String)>) -> Result<()> {
    let user = config
        .user
        .as_deref()
        .context("No Last.fm user configured (use --user or NOWPLAYING_USER)")?;

    let params = extra
        .into_iter()
        .fold(SubmitParams::for_user(user), |params, (key, value)| {
            params.with(key, value)
        });

    let handle = config.poller()?.submit(&params).await?;

    println!("{} Submitted job {}", "✓".green(), handle.to_string().bold());
    Ok(())
}

/// Check a job once
async fn job_status(client: &JobClient, handle: JobHandle) -> Result<()> {
    let status = client
        .job_status(&handle)
        .await
        .with_context(|| format!("Failed to check job {}", handle))?;

    match status {
        PollResult::Running => println!("Job {}: {}", handle, "running".yellow()),
        PollResult::Succeeded(payload) => {
            println!("Job {}: {}", handle, "success".green());
            println!("    Result: {}", payload.dimmed());
        }
        PollResult::Failed(status) => println!("Job {}: {}", handle, status.red()),
    }

    Ok(())
}

/// Poll a job until a terminal state or Ctrl-C
async fn watch_job(config: &Config, handle: JobHandle) -> Result<()> {
    let poller = config.poller()?;
    let field = Arc::new(MusicField::new(config.loading_mode));

    let session = poller.start_polling(handle, deliver_to(field.clone(), error_sink(config)));

    println!(
        "{}",
        format!(
            "Polling job {} every {:?}...",
            session.handle(),
            poller.interval()
        )
        .dimmed()
    );

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, cancelling session {}", session.id());
            session.cancel();
        }
        _ = session.stopped() => {}
    }

    match session.wait().await? {
        SessionEnd::Completed(JobOutcome::Success(_)) => print_field(&field.value()),
        SessionEnd::Completed(JobOutcome::Failure(message)) => {
            println!("{}", message.red());
        }
        SessionEnd::Cancelled => println!("{}", "Cancelled.".yellow()),
    }

    Ok(())
}

/// Parse a `key=value` pair
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{}`", s))?;

    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in `{}`", s));
    }

    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("source=lastfm").unwrap(),
            ("source".to_string(), "lastfm".to_string())
        );
        assert_eq!(
            parse_key_val("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }
}
