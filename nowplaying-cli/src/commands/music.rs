//! Music field command handler
//!
//! Runs one "current music" refresh and prints what the field ends up with.

use anyhow::Result;
use colored::*;
use nowplaying_client::{
    ErrorSink, MusicField, RefreshOutcome, SessionEnd, SkipReason, Trigger, refresh_current_music,
};
use nowplaying_core::domain::job::JobOutcome;
use nowplaying_core::domain::track::Track;
use std::sync::Arc;

use crate::config::Config;

/// Error sink printing to stderr
pub struct StderrErrorSink;

impl ErrorSink for StderrErrorSink {
    fn notify(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}

/// Error sink matching the configured visibility
pub fn error_sink(config: &Config) -> Option<Arc<dyn ErrorSink>> {
    if config.show_errors {
        Some(Arc::new(StderrErrorSink))
    } else {
        None
    }
}

/// Refresh the music field once
pub async fn fetch_current_music(
    config: &Config,
    on_init: bool,
    current: Option<String>,
) -> Result<()> {
    let poller = config.poller()?;
    let field = Arc::new(match current {
        Some(text) => MusicField::with_value(config.loading_mode, text),
        None => MusicField::new(config.loading_mode),
    });
    let trigger = if on_init {
        Trigger::PageInit
    } else {
        Trigger::Manual
    };

    println!("{}", "Looking up current music...".dimmed());

    let outcome = refresh_current_music(
        &poller,
        config.user.as_deref(),
        Arc::clone(&field),
        error_sink(config),
        trigger,
    )
    .await?;

    match outcome {
        RefreshOutcome::Skipped(SkipReason::NoUser) => {
            println!("{}", "No Last.fm user configured, nothing to do.".yellow());
        }
        RefreshOutcome::Skipped(SkipReason::FieldFilled) => {
            println!("{}", "Music field already filled, keeping it.".yellow());
            print_field(&field.value());
        }
        RefreshOutcome::Finished(SessionEnd::Completed(JobOutcome::Success(_))) => {
            print_field(&field.value());
        }
        RefreshOutcome::Finished(SessionEnd::Completed(JobOutcome::Failure(_))) => {
            println!("{}", "Lookup failed, music field cleared.".yellow());
        }
        RefreshOutcome::Finished(SessionEnd::Cancelled) => {
            println!("{}", "Lookup cancelled.".yellow());
        }
    }

    Ok(())
}

/// Print the music field value
pub fn print_field(value: &str) {
    if value.is_empty() {
        println!("{}", "Nothing playing right now.".yellow());
        return;
    }

    match Track::from_field_text(value) {
        Some(track) => {
            println!("{} {}", "♪".cyan(), value.green().bold());
            println!("    Artist: {}", track.artist);
            println!("    Title:  {}", track.title);
        }
        None => println!("{} {}", "♪".cyan(), value.green().bold()),
    }
}
