//! Nowplaying HTTP Client
//!
//! Submits "current music" lookup jobs to a remote job endpoint and polls
//! the job status endpoint until the job reaches a terminal state.
//!
//! The crate is organised in three layers:
//! - [`JobClient`]: typed access to the submission and status endpoints
//! - [`JobPoller`]: the submit-then-poll lifecycle built on any [`JobBackend`]
//! - [`sink`]: where the final value and error messages end up
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nowplaying_client::{JobClient, JobPoller, MusicField, LoadingMode, deliver_to};
//! use nowplaying_core::dto::job::SubmitParams;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = JobClient::new(
//!         "http://localhost:8080/tools/endpoints/jobsubmit",
//!         "http://localhost:8080/tools/endpoints/jobstatus",
//!     );
//!     let poller = JobPoller::new(Arc::new(client));
//!     let field = Arc::new(MusicField::new(LoadingMode::Post));
//!
//!     let handle = poller.submit(&SubmitParams::for_user("alice")).await?;
//!     let session = poller.start_polling(handle, deliver_to(field.clone(), None));
//!     session.wait().await?;
//!
//!     println!("Now playing: {}", field.value());
//!     Ok(())
//! }
//! ```

mod backend;
pub mod error;
mod jobs;
pub mod music;
pub mod poller;
pub mod sink;

// Re-export commonly used types
pub use backend::JobBackend;
pub use error::{ClientError, Result};
pub use music::{RefreshOutcome, SkipReason, Trigger, refresh_current_music};
pub use poller::{
    DEFAULT_POLL_INTERVAL, JobPoller, MIN_POLL_INTERVAL, PollerError, PollerSession, SessionEnd,
    deliver_to,
};
pub use sink::{ErrorSink, LoadingMode, MusicField, ResultSink};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the job submission and job status endpoints
#[derive(Debug, Clone)]
pub struct JobClient {
    /// Endpoint accepting form-encoded job parameters
    submit_url: String,
    /// Endpoint reporting the state of a submitted job
    status_url: String,
    /// HTTP client instance
    client: Client,
}

impl JobClient {
    /// Create a new job client
    ///
    /// # Arguments
    /// * `submit_url` - Full URL of the job submission endpoint
    /// * `status_url` - Full URL of the job status endpoint
    ///
    /// # Example
    /// ```
    /// use nowplaying_client::JobClient;
    ///
    /// let client = JobClient::new(
    ///     "http://localhost:8080/jobsubmit",
    ///     "http://localhost:8080/jobstatus",
    /// );
    /// ```
    pub fn new(submit_url: impl Into<String>, status_url: impl Into<String>) -> Self {
        Self::with_client(submit_url, status_url, Client::new())
    }

    /// Create a new job client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use nowplaying_client::JobClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = JobClient::with_client(
    ///     "http://localhost:8080/jobsubmit",
    ///     "http://localhost:8080/jobstatus",
    ///     http_client,
    /// );
    /// ```
    pub fn with_client(
        submit_url: impl Into<String>,
        status_url: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            submit_url: submit_url.into().trim_end_matches('/').to_string(),
            status_url: status_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the submission endpoint URL
    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }

    /// Get the status endpoint URL
    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
