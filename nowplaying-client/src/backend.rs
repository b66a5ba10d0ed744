//! Seam between the poller and whatever answers job requests

use async_trait::async_trait;
use nowplaying_core::domain::job::{JobHandle, PollResult};
use nowplaying_core::dto::job::SubmitParams;

use crate::JobClient;
use crate::error::Result;

/// Remote job system as seen by the poller
///
/// [`JobClient`] is the HTTP implementation; tests script their own.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Submit a job and obtain its handle
    async fn submit(&self, params: &SubmitParams) -> Result<JobHandle>;

    /// Perform one status check for a job
    async fn status(&self, handle: &JobHandle) -> Result<PollResult>;
}

#[async_trait]
impl JobBackend for JobClient {
    async fn submit(&self, params: &SubmitParams) -> Result<JobHandle> {
        self.submit_job(params).await
    }

    async fn status(&self, handle: &JobHandle) -> Result<PollResult> {
        self.job_status(handle).await
    }
}
