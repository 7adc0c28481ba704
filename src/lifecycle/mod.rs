mod backoff;
pub(crate) mod runner;
mod state;

pub use backoff::{PollPolicy, PollSettings};
pub use runner::{CancelSignal, JobReport, JobRunner, PollObserver};
