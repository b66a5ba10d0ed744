//! Configuration module
//!
//! Endpoint locations, the Last.fm user and polling settings. Values come
//! from command-line flags with environment fallbacks (see `main.rs`).

use anyhow::{Context, Result};
use nowplaying_client::{DEFAULT_POLL_INTERVAL, JobClient, JobPoller, LoadingMode};
use std::sync::Arc;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the job submission endpoint
    pub submit_url: String,

    /// URL of the job status endpoint
    pub status_url: String,

    /// Last.fm user whose current track is looked up
    pub user: Option<String>,

    /// How often a running job is checked
    pub poll_interval: Duration,

    /// Timeout applied to every single HTTP request
    pub request_timeout: Duration,

    /// Forward failures to the error output
    pub show_errors: bool,

    /// How the music field shows a running lookup
    pub loading_mode: LoadingMode,
}

impl Config {
    /// Creates a configuration with default intervals
    pub fn new(submit_url: String, status_url: String) -> Self {
        Self {
            submit_url,
            status_url,
            user: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(10),
            show_errors: false,
            loading_mode: LoadingMode::Post,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("submit_url", &self.submit_url),
            ("status_url", &self.status_url),
        ] {
            if url.is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }

            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds the HTTP job client
    pub fn job_client(&self) -> Result<JobClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(JobClient::with_client(
            self.submit_url.clone(),
            self.status_url.clone(),
            http_client,
        ))
    }

    /// Builds a poller over the HTTP job client
    pub fn poller(&self) -> Result<JobPoller> {
        let client = self.job_client()?;
        Ok(JobPoller::new(Arc::new(client)).with_interval(self.poll_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            "http://localhost:8080/tools/endpoints/jobsubmit".to_string(),
            "http://localhost:8080/tools/endpoints/jobstatus".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.user.is_none());
        assert!(!config.show_errors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        config.submit_url = String::new();
        assert!(config.validate().is_err());

        config.submit_url = "ftp://example.com/submit".to_string();
        assert!(config.validate().is_err());

        config.submit_url = "https://example.com/submit".to_string();
        config.status_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.status_url = "https://example.com/status".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poller_uses_configured_interval() {
        let mut config = Config::default();
        config.poll_interval = Duration::from_millis(250);

        let poller = config.poller().unwrap();
        assert_eq!(poller.interval(), Duration::from_millis(250));
    }
}
