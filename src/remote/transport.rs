use std::future::Future;

use thiserror::Error;

use super::types::EnqueueRequest;
use crate::error::RemoteFailure;
use crate::state_machine::{Job, JobStatus};

/// Failures a [`Transport`] can hand back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with an error response; input for the classifier.
    #[error(transparent)]
    Remote(#[from] RemoteFailure),

    /// DNS, connection, TLS or timeout failure below HTTP.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The job id cannot be placed in a request path (empty, `.` or `..`).
    #[error("job id {0:?} cannot be used in a request path")]
    InvalidJobId(String),

    /// A success response whose body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// The remote side of the job service.
///
/// Implementations perform one attempt per call. Validation happens before a
/// transport is reached, and classification after it returns.
pub trait Transport: Send + Sync {
    /// Ask the server to move `job_id` to `target`; returns the confirmed status.
    fn submit_transition(
        &self,
        job_id: &str,
        target: JobStatus,
    ) -> impl Future<Output = Result<JobStatus, TransportError>> + Send;

    fn fetch_job(&self, job_id: &str) -> impl Future<Output = Result<Job, TransportError>> + Send;

    fn enqueue(
        &self,
        request: &EnqueueRequest,
    ) -> impl Future<Output = Result<Job, TransportError>> + Send;
}
