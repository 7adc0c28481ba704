use std::fmt;

use tokio::time::Instant;

use crate::codemaker::JobStatus;

/// States of one job as seen from the client.
///
/// Each job flows through: SUBMITTED → POLLING → {COMPLETED | FAILED | CLIENT_TIMED_OUT}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Submitted,
    Polling,
    Completed,
    Failed,
    ClientTimedOut,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Submitted => write!(f, "SUBMITTED"),
            State::Polling => write!(f, "POLLING"),
            State::Completed => write!(f, "COMPLETED"),
            State::Failed => write!(f, "FAILED"),
            State::ClientTimedOut => write!(f, "CLIENT_TIMED_OUT"),
        }
    }
}

/// What the polling loop does after observing a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The service finished the job; its output may now be fetched.
    Complete,
    /// The service gave up on the job (`Failed` or `TimedOut`).
    Fail(JobStatus),
    /// The client-side deadline passed while the job was still running.
    Expire,
    /// Back off and poll again.
    Wait,
}

impl Transition {
    pub fn target(&self) -> State {
        match self {
            Transition::Complete => State::Completed,
            Transition::Fail(_) => State::Failed,
            Transition::Expire => State::ClientTimedOut,
            Transition::Wait => State::Polling,
        }
    }
}

/// Pure decision step of the polling loop.
pub struct PollStateMachine;

impl PollStateMachine {
    /// Compute the transition for a freshly observed `status`.
    ///
    /// Terminal statuses win over the deadline: a job that completes right at
    /// the deadline is still fetched.
    pub fn next(status: JobStatus, now: Instant, deadline: Instant) -> Transition {
        match status {
            JobStatus::Completed => Transition::Complete,
            JobStatus::Failed | JobStatus::TimedOut => Transition::Fail(status),
            JobStatus::Pending | JobStatus::Running if now > deadline => Transition::Expire,
            JobStatus::Pending | JobStatus::Running => Transition::Wait,
        }
    }
}
