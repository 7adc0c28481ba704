use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tracing::debug;

use super::backoff::PollPolicy;
use super::state::{PollStateMachine, State, Transition};
use crate::codemaker::{JobClient, JobHandle, JobOutput, JobRequest, JobStatus};
use crate::error::CodemakerError;

/// Hooks fired while a job is driven to completion. All default to no-ops.
pub trait PollObserver {
    fn submitted(&self, _handle: &JobHandle) {}

    fn status(&self, _attempt: u32, _status: JobStatus) {}

    fn backoff(&self, _attempt: u32, _delay: Duration) {}
}

impl PollObserver for () {}

/// Receiving side of an interactive stop request (Ctrl-C).
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    /// Returns the trigger and the signal. Sending `true` cancels.
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self(rx))
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation is requested; never if the trigger is dropped.
    pub async fn cancelled(&mut self) {
        if self.0.wait_for(|c| *c).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Await `fut` unless cancellation is requested first. `None` means cancelled.
///
/// A future that is already ready wins over a pending cancellation.
async fn unless_cancelled<T>(
    cancel: &mut Option<CancelSignal>,
    fut: impl Future<Output = T>,
) -> Option<T> {
    match cancel.as_mut() {
        Some(signal) => {
            tokio::select! {
                biased;
                out = fut => Some(out),
                _ = signal.cancelled() => None,
            }
        }
        None => Some(fut.await),
    }
}

/// Result of a job that reached `Completed`.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub handle: JobHandle,
    pub output: JobOutput,
    pub polls: u32,
    pub elapsed: Duration,
}

/// Drives one job: submit, poll with backoff until terminal, fetch.
pub struct JobRunner<'a, C> {
    client: &'a C,
    policy: &'a PollPolicy,
    cancel: Option<CancelSignal>,
}

impl<'a, C: JobClient> JobRunner<'a, C> {
    pub fn new(client: &'a C, policy: &'a PollPolicy) -> Self {
        Self {
            client,
            policy,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: Option<CancelSignal>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run `request` to a terminal state.
    ///
    /// Submission and transport failures are returned as-is and never
    /// retried here. Output is fetched only after a `Completed` status.
    /// Every service call and backoff sleep is abandoned on cancellation.
    pub async fn run(
        &self,
        request: &JobRequest,
        observer: &dyn PollObserver,
    ) -> Result<JobReport, CodemakerError> {
        let mut cancel = self.cancel.clone();
        let handle = unless_cancelled(&mut cancel, self.client.submit(request))
            .await
            .ok_or(CodemakerError::Interrupted)?
            .map_err(CodemakerError::Submission)?;
        let started = Instant::now();
        let deadline = started + self.policy.timeout;
        observer.submitted(&handle);
        debug!(job = %handle, state = %State::Submitted, mode = ?request.mode, "job submitted");

        let mut attempt: u32 = 0;
        loop {
            let Some(status) = unless_cancelled(&mut cancel, self.client.poll_status(&handle)).await
            else {
                return Err(CodemakerError::Cancelled(handle));
            };
            let status = status.map_err(CodemakerError::Transport)?;
            observer.status(attempt, status);

            let transition = PollStateMachine::next(status, Instant::now(), deadline);
            debug!(job = %handle, attempt, %status, state = %transition.target(), "polled");
            match transition {
                Transition::Complete => break,
                Transition::Fail(JobStatus::TimedOut) => {
                    return Err(CodemakerError::ServiceTimedOut(handle));
                }
                Transition::Fail(_) => return Err(CodemakerError::ServiceProcessingFailed(handle)),
                Transition::Expire => {
                    return Err(CodemakerError::ClientTimedOut {
                        handle,
                        elapsed: started.elapsed(),
                    });
                }
                Transition::Wait => {}
            }

            if cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
                return Err(CodemakerError::Cancelled(handle));
            }

            let delay = self.policy.delay_for_attempt(attempt);
            observer.backoff(attempt, delay);
            if unless_cancelled(&mut cancel, sleep(delay)).await.is_none() {
                return Err(CodemakerError::Cancelled(handle));
            }
            attempt += 1;
        }

        let Some(output) = unless_cancelled(&mut cancel, self.client.fetch_output(&handle)).await
        else {
            return Err(CodemakerError::Cancelled(handle));
        };
        let output = output.map_err(CodemakerError::Transport)?;

        Ok(JobReport {
            handle,
            output,
            polls: attempt + 1,
            elapsed: started.elapsed(),
        })
    }
}
