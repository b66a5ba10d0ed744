//! Nowplaying CLI
//!
//! Command-line front end for the "current music" lookup: submits a job for
//! a Last.fm user, polls it to completion and prints the resulting field.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use nowplaying_client::LoadingMode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nowplaying")]
#[command(about = "Fill the current music field from a Last.fm lookup job", long_about = None)]
struct Cli {
    /// Job submission endpoint
    #[arg(
        long,
        env = "NOWPLAYING_SUBMIT_URL",
        default_value = "http://localhost:8080/tools/endpoints/jobsubmit"
    )]
    submit_url: String,

    /// Job status endpoint
    #[arg(
        long,
        env = "NOWPLAYING_STATUS_URL",
        default_value = "http://localhost:8080/tools/endpoints/jobstatus"
    )]
    status_url: String,

    /// Last.fm user name
    #[arg(long, env = "NOWPLAYING_USER")]
    user: Option<String>,

    /// Milliseconds between two status checks
    #[arg(long, env = "NOWPLAYING_POLL_INTERVAL_MS", default_value_t = 1500)]
    poll_interval_ms: u64,

    /// Timeout of a single HTTP request, in seconds
    #[arg(long, env = "NOWPLAYING_REQUEST_TIMEOUT", default_value_t = 10)]
    request_timeout: u64,

    /// Print failures reported by the job endpoints
    #[arg(long, env = "NOWPLAYING_SHOW_ERRORS")]
    show_errors: bool,

    /// Use the classic editor's "Loading..." placeholder
    #[arg(long)]
    classic: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nowplaying=info,nowplaying_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        user: cli.user,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        request_timeout: Duration::from_secs(cli.request_timeout),
        show_errors: cli.show_errors,
        loading_mode: if cli.classic {
            LoadingMode::Classic
        } else {
            LoadingMode::Post
        },
        ..Config::new(cli.submit_url, cli.status_url)
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
