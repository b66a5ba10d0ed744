//! Job poller
//!
//! Submits a job, then checks its status on a fixed interval until the
//! remote reports a terminal state. The final value is handed to a
//! callback exactly once per session.
//!
//! Each session owns its timer as a cancellation token. Reaching a terminal
//! state and external cancellation both go through a single `delivered`
//! flag, so whichever happens first wins and the other is a no-op.

use nowplaying_core::domain::job::{JobHandle, JobOutcome, PollResult};
use nowplaying_core::domain::track::parse_payload;
use nowplaying_core::dto::job::SubmitParams;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::JobBackend;
use crate::sink::{ErrorSink, ResultSink};

/// Period between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Shortest period a poller accepts
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Callback receiving the final outcome of a session
pub type ResultCallback = Box<dyn FnOnce(JobOutcome) + Send + 'static>;

/// Errors surfaced by the poller
#[derive(Debug, Error)]
pub enum PollerError {
    /// The submission endpoint refused the job or could not be reached
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// The polling task panicked or was aborted
    #[error("Poll task failed: {0}")]
    TaskFailed(String),
}

impl PollerError {
    /// Message suitable for an error sink
    pub fn user_message(&self) -> &str {
        match self {
            Self::SubmissionFailed(message) | Self::TaskFailed(message) => message,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// A terminal state was reached and delivered
    Completed(JobOutcome),
    /// The session was cancelled before any terminal state was delivered
    Cancelled,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
enum TickOutcome {
    Pending,
    Delivered(JobOutcome),
    Suppressed,
}

struct SessionState {
    id: Uuid,
    handle: JobHandle,
    timer: CancellationToken,
    delivered: AtomicBool,
    ticks: AtomicU64,
    on_result: Mutex<Option<ResultCallback>>,
}

impl SessionState {
    fn new(handle: JobHandle, on_result: ResultCallback) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle,
            timer: CancellationToken::new(),
            delivered: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            on_result: Mutex::new(Some(on_result)),
        }
    }

    /// Acts on one status check
    fn process(&self, result: PollResult) -> TickOutcome {
        if !result.is_terminal() {
            debug!("Job {} still running", self.handle);
            return TickOutcome::Pending;
        }

        if !self.claim() {
            return TickOutcome::Suppressed;
        }

        let outcome = match result {
            PollResult::Succeeded(payload) => JobOutcome::Success(interpret_payload(&payload)),
            PollResult::Failed(status) => {
                warn!("Job {} ended with status {:?}", self.handle, status);
                JobOutcome::Failure(failure_message(&status))
            }
            PollResult::Running => return TickOutcome::Pending,
        };

        self.deliver(outcome)
    }

    /// Stops the timer and takes the right to deliver
    ///
    /// Returns false when the session was already delivered or cancelled.
    fn claim(&self) -> bool {
        self.timer.cancel();

        if self.delivered.swap(true, Ordering::AcqRel) {
            debug!("Ignoring terminal status for finished job {}", self.handle);
            return false;
        }

        true
    }

    fn deliver(&self, outcome: JobOutcome) -> TickOutcome {
        let callback = self
            .on_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(callback) = callback {
            callback(outcome.clone());
        }

        TickOutcome::Delivered(outcome)
    }

    fn cancel(&self) {
        self.delivered.store(true, Ordering::Release);
        self.timer.cancel();
    }
}

fn interpret_payload(payload: &str) -> String {
    match parse_payload(payload) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not interpret job result, clearing value: {}", e);
            String::new()
        }
    }
}

fn failure_message(status: &str) -> String {
    format!("Failed to fetch current music (job status: {})", status)
}

/// Builds a result callback writing to a sink
///
/// Failures clear the sink and, if an error sink is given, are reported
/// there as well.
pub fn deliver_to(
    sink: Arc<dyn ResultSink>,
    errors: Option<Arc<dyn ErrorSink>>,
) -> impl FnOnce(JobOutcome) + Send + 'static {
    move |outcome| {
        sink.write(outcome.field_value());

        if let (JobOutcome::Failure(message), Some(errors)) = (&outcome, &errors) {
            errors.notify(message);
        }
    }
}

/// A running submit-to-completion lifecycle
pub struct PollerSession {
    state: Arc<SessionState>,
    task: JoinHandle<SessionEnd>,
}

impl PollerSession {
    /// Local identifier used in logs
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn handle(&self) -> &JobHandle {
        &self.state.handle
    }

    /// Stops polling and suppresses any response still in flight
    pub fn cancel(&self) {
        info!("Cancelling poll of job {}", self.state.handle);
        self.state.cancel();
    }

    /// Whether a result was delivered or the session was cancelled
    pub fn is_delivered(&self) -> bool {
        self.state.delivered.load(Ordering::Acquire)
    }

    /// Whether the polling task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Resolves once the timer is gone, by a terminal state or cancellation
    pub async fn stopped(&self) {
        self.state.timer.cancelled().await;
    }

    /// Number of status checks performed so far
    pub fn ticks(&self) -> u64 {
        self.state.ticks.load(Ordering::Relaxed)
    }

    /// Waits for the session to end
    pub async fn wait(self) -> Result<SessionEnd, PollerError> {
        self.task
            .await
            .map_err(|e| PollerError::TaskFailed(e.to_string()))
    }
}

/// Submits jobs and polls them to completion
#[derive(Clone)]
pub struct JobPoller {
    backend: Arc<dyn JobBackend>,
    interval: Duration,
}

impl JobPoller {
    /// Creates a poller checking every [`DEFAULT_POLL_INTERVAL`]
    pub fn new(backend: Arc<dyn JobBackend>) -> Self {
        Self {
            backend,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the period between checks, raised to [`MIN_POLL_INTERVAL`]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                "Poll interval {:?} too short, using {:?}",
                interval, MIN_POLL_INTERVAL
            );
        }
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Submits a job
    ///
    /// Any failure, transport or application level, is reported as
    /// [`PollerError::SubmissionFailed`] and nothing is polled.
    pub async fn submit(&self, params: &SubmitParams) -> Result<JobHandle, PollerError> {
        match self.backend.submit(params).await {
            Ok(handle) => {
                info!("Submitted job {}", handle);
                Ok(handle)
            }
            Err(e) => {
                warn!("Job submission failed: {}", e);
                Err(PollerError::SubmissionFailed(e.user_message()))
            }
        }
    }

    /// Starts polling a submitted job
    ///
    /// The first check fires one interval after this call. Must be called
    /// from within a tokio runtime.
    pub fn start_polling<F>(&self, handle: JobHandle, on_result: F) -> PollerSession
    where
        F: FnOnce(JobOutcome) + Send + 'static,
    {
        let state = Arc::new(SessionState::new(handle, Box::new(on_result)));

        info!(
            "Starting poll of job {} (session {}, interval: {:?})",
            state.handle, state.id, self.interval
        );

        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.backend),
            Arc::clone(&state),
            self.interval,
        ));

        PollerSession { state, task }
    }

    /// Runs the whole lifecycle against a sink
    ///
    /// The sink is put into its loading state first and always receives a
    /// final value, including when submission fails or the poll task dies.
    pub async fn run(
        &self,
        params: &SubmitParams,
        sink: Arc<dyn ResultSink>,
        errors: Option<Arc<dyn ErrorSink>>,
    ) -> Result<SessionEnd, PollerError> {
        sink.begin_loading();

        let handle = match self.submit(params).await {
            Ok(handle) => handle,
            Err(e) => {
                sink.write("");
                if let Some(errors) = &errors {
                    errors.notify(e.user_message());
                }
                return Err(e);
            }
        };

        let session = self.start_polling(handle, deliver_to(Arc::clone(&sink), errors.clone()));
        let state = Arc::clone(&session.state);

        match session.wait().await {
            Ok(end) => Ok(end),
            Err(e) => {
                warn!("Poll of job {} aborted: {}", state.handle, e);
                if !state.delivered.swap(true, Ordering::AcqRel) {
                    sink.write("");
                    if let Some(errors) = &errors {
                        errors.notify(e.user_message());
                    }
                }
                Err(e)
            }
        }
    }
}

async fn poll_loop(
    backend: Arc<dyn JobBackend>,
    state: Arc<SessionState>,
    period: Duration,
) -> SessionEnd {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = state.timer.cancelled() => break,
            _ = ticker.tick() => {}
        }

        state.ticks.fetch_add(1, Ordering::Relaxed);

        let status = tokio::select! {
            biased;
            _ = state.timer.cancelled() => break,
            status = backend.status(&state.handle) => status,
        };

        match status {
            Ok(result) => match state.process(result) {
                TickOutcome::Pending => {}
                TickOutcome::Delivered(outcome) => {
                    info!("Job {} finished (session {})", state.handle, state.id);
                    return SessionEnd::Completed(outcome);
                }
                TickOutcome::Suppressed => break,
            },
            Err(e) => {
                warn!(
                    "Status check for job {} failed, retrying next tick: {}",
                    state.handle, e
                );
            }
        }
    }

    debug!("Poll of job {} stopped (session {})", state.handle, state.id);
    SessionEnd::Cancelled
}
