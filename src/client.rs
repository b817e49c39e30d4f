use crate::classifier::ClientErrorClassifier;
use crate::config::ClientConfig;
use crate::error::{ClientError, Error};
use crate::remote::{EnqueueRequest, HttpTransport, Transport, TransportError};
use crate::state_machine::{
    DeduplicationId, Job, JobStatus, StatusTransitionValidator, TransitionRequest,
    TransitionTable, TransitionVerdict, Violation,
};

/// Result of an idempotent transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The server confirmed the move to this status.
    Changed(JobStatus),
    /// The job was already in this status; nothing was changed.
    Unchanged(JobStatus),
}

impl TransitionOutcome {
    pub fn status(self) -> JobStatus {
        match self {
            TransitionOutcome::Changed(status) | TransitionOutcome::Unchanged(status) => status,
        }
    }
}

/// Result of submitting a job.
#[derive(Debug, Clone, PartialEq)]
pub enum Enqueued {
    Created(Job),
    /// A job with the same deduplication id already exists.
    Existing {
        deduplication_id: DeduplicationId,
        job_id: Option<String>,
    },
}

/// Validates transitions locally and talks to the job service through a
/// [`Transport`]. Server failures are classified here, once.
pub struct JobClient<T> {
    transport: T,
    table: TransitionTable,
}

impl JobClient<HttpTransport> {
    /// HTTP client built from configuration, using the configured transition
    /// table when present.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_table(transport, config.transition_table()))
    }
}

impl<T: Transport> JobClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_table(transport, TransitionTable::default())
    }

    pub fn with_table(transport: T, table: TransitionTable) -> Self {
        Self { transport, table }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Local check only; never touches the network.
    pub fn validate(&self, current: JobStatus, target: JobStatus) -> TransitionVerdict {
        StatusTransitionValidator::validate_with(&self.table, TransitionRequest::new(current, target))
    }

    /// Move `job_id` from `current` to `target`.
    ///
    /// Illegal transitions fail locally without a request. Every rejection,
    /// including a no-op, is returned as an error.
    pub async fn transition(
        &self,
        job_id: &str,
        current: JobStatus,
        target: JobStatus,
    ) -> Result<JobStatus, Error> {
        let request = TransitionRequest::new(current, target);
        let verdict = self.validate(current, target);
        match verdict {
            TransitionVerdict::Allowed => {}
            TransitionVerdict::Rejected(Violation::NoOpTransition) => {
                tracing::debug!(job_id, transition = %request, "transition is a no-op");
            }
            TransitionVerdict::Rejected(violation) => {
                tracing::warn!(job_id, transition = %request, ?violation, "transition rejected locally");
            }
        }
        verdict.into_result(request)?;

        self.transport
            .submit_transition(job_id, target)
            .await
            .map_err(|e| self.lift(e))
    }

    /// Like [`transition`](Self::transition), but a job already in `target`
    /// (locally known or reported by the server) is a success.
    pub async fn transition_idempotent(
        &self,
        job_id: &str,
        current: JobStatus,
        target: JobStatus,
    ) -> Result<TransitionOutcome, Error> {
        if self.validate(current, target) == TransitionVerdict::Rejected(Violation::NoOpTransition) {
            return Ok(TransitionOutcome::Unchanged(current));
        }

        match self.transition(job_id, current, target).await {
            Ok(status) => Ok(TransitionOutcome::Changed(status)),
            Err(Error::Client(ClientError::NoOpTransitionReported { target, .. })) => {
                Ok(TransitionOutcome::Unchanged(target))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the job's current status from the server, then transition
    /// idempotently. Use after a forbidden transition caused by a stale view.
    pub async fn refresh_and_transition(
        &self,
        job_id: &str,
        target: JobStatus,
    ) -> Result<TransitionOutcome, Error> {
        let job = self.fetch_job(job_id).await?;
        self.transition_idempotent(job_id, job.status, target).await
    }

    pub async fn fetch_job(&self, job_id: &str) -> Result<Job, Error> {
        self.transport
            .fetch_job(job_id)
            .await
            .map_err(|e| self.lift(e))
    }

    /// Submit a new job. A deduplication conflict means the job was already
    /// submitted and is reported as [`Enqueued::Existing`].
    pub async fn enqueue(&self, request: &EnqueueRequest) -> Result<Enqueued, Error> {
        match self.transport.enqueue(request).await.map_err(|e| self.lift(e)) {
            Ok(job) => Ok(Enqueued::Created(job)),
            Err(Error::Client(ClientError::DeduplicationIdConflict {
                existing_job_id, ..
            })) => {
                tracing::info!(
                    deduplication_id = %request.deduplication_id,
                    existing_job_id = ?existing_job_id,
                    "job already enqueued"
                );
                Ok(Enqueued::Existing {
                    deduplication_id: request.deduplication_id.clone(),
                    job_id: existing_job_id,
                })
            }
            Err(e) => Err(e),
        }
    }

    fn lift(&self, err: TransportError) -> Error {
        match err {
            TransportError::Remote(failure) => {
                ClientErrorClassifier::classify_failure_with(&self.table, failure).into()
            }
            other => other.into(),
        }
    }
}
