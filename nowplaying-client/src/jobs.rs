//! Job submission and job status endpoints

use crate::JobClient;
use crate::error::{ClientError, Result};
use nowplaying_core::domain::job::{JobHandle, PollResult};
use nowplaying_core::dto::job::{StatusResponse, SubmitParams, SubmitResponse};
use tracing::debug;

impl JobClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a new job
    ///
    /// Parameters are sent form-encoded. A body carrying `error` is turned
    /// into [`ClientError::Rejected`] with the remote's message.
    ///
    /// # Arguments
    /// * `params` - The job parameters
    ///
    /// # Returns
    /// The handle of the submitted job
    ///
    /// # Example
    /// ```no_run
    /// # use nowplaying_client::JobClient;
    /// # use nowplaying_core::dto::job::SubmitParams;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = JobClient::new("http://localhost:8080/jobsubmit", "http://localhost:8080/jobstatus");
    /// let handle = client.submit_job(&SubmitParams::for_user("alice")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_job(&self, params: &SubmitParams) -> Result<JobHandle> {
        let response = self
            .client
            .post(&self.submit_url)
            .form(params)
            .send()
            .await?;

        let body: SubmitResponse = self.handle_response(response).await?;
        let handle = body.into_handle().map_err(ClientError::Rejected)?;

        debug!("Submitted job, handle {}", handle);
        Ok(handle)
    }

    /// Get the status of a submitted job
    ///
    /// # Arguments
    /// * `handle` - The handle returned by [`JobClient::submit_job`]
    ///
    /// # Returns
    /// The classified outcome of this single check
    pub async fn job_status(&self, handle: &JobHandle) -> Result<PollResult> {
        let response = self
            .client
            .get(&self.status_url)
            .query(&[("handle", handle.as_str())])
            .send()
            .await?;

        let body: StatusResponse = self.handle_response(response).await?;
        Ok(body.into_poll_result())
    }
}
