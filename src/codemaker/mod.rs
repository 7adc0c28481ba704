pub mod client;
pub mod error;
pub mod types;

pub use client::CodemakerClient;
pub use error::ClientError;
pub use types::{JobHandle, JobOutput, JobRequest, JobStatus, Mode, Modify};

/// The three service calls the job engine depends on.
///
/// `fetch_output` must only be called after `poll_status` reported
/// [`JobStatus::Completed`] for the same handle.
#[allow(async_fn_in_trait)]
pub trait JobClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError>;

    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus, ClientError>;

    async fn fetch_output(&self, handle: &JobHandle) -> Result<JobOutput, ClientError>;
}
