use serde_json::{Map, Value};
use thiserror::Error;

use crate::remote::TransportError;
use crate::state_machine::JobStatus;

/// Raw response body returned by the server, kept verbatim for diagnostics.
pub type ResponsePayload = Map<String, Value>;

/// A failed remote call, as handed over by a transport.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("remote failure (HTTP {http_status}, code {code:?})")]
pub struct RemoteFailure {
    /// Server error code, empty when the body carried none.
    pub code: String,
    pub http_status: u16,
    pub payload: ResponsePayload,
}

/// Top-level error for client operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// The typed client error, if this is one.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Client(err) => Some(err),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.client_error().map(ClientError::kind)
    }
}

/// Discriminant of [`ClientError`], for branching without matching fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidStatus,
    NoOpTransition,
    NoOpTransitionReported,
    TerminalStateViolation,
    TerminalStateViolationReported,
    ForbiddenTransition,
    ForbiddenTransitionReported,
    DeduplicationIdConflict,
    Generic,
}

impl ErrorKind {
    /// The job is already where the caller wanted it.
    pub const fn is_idempotent_success(self) -> bool {
        matches!(self, Self::NoOpTransition | Self::NoOpTransitionReported)
    }

    /// The caller's view of the job status may be stale.
    pub const fn requires_refresh(self) -> bool {
        matches!(
            self,
            Self::ForbiddenTransition | Self::ForbiddenTransitionReported
        )
    }

    /// Whether the server rejected the request, as opposed to a local check.
    pub const fn is_reported(self) -> bool {
        matches!(
            self,
            Self::NoOpTransitionReported
                | Self::TerminalStateViolationReported
                | Self::ForbiddenTransitionReported
                | Self::DeduplicationIdConflict
                | Self::Generic
        )
    }

    /// None of these kinds succeed when repeated unchanged; retrying network
    /// failures is the transport's business.
    pub const fn is_retryable(self) -> bool {
        false
    }
}

/// Typed failures detected locally or reported by the remote service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("invalid job status: {value:?}")]
    InvalidStatus { value: String },

    #[error("job is already {status}")]
    NoOpTransition { status: JobStatus },

    #[error("job is in terminal status {current} and cannot move to {target}")]
    TerminalStateViolation { current: JobStatus, target: JobStatus },

    #[error("transition from {current} to {target} is not allowed")]
    ForbiddenTransition { current: JobStatus, target: JobStatus },

    #[error("{message}")]
    NoOpTransitionReported {
        current: JobStatus,
        target: JobStatus,
        message: String,
        payload: ResponsePayload,
    },

    #[error("{message}")]
    TerminalStateViolationReported {
        current: JobStatus,
        message: String,
        payload: ResponsePayload,
    },

    #[error("{message}")]
    ForbiddenTransitionReported {
        current: JobStatus,
        target: JobStatus,
        message: String,
        payload: ResponsePayload,
    },

    #[error("{message}")]
    DeduplicationIdConflict {
        deduplication_id: Option<String>,
        existing_job_id: Option<String>,
        message: String,
        payload: ResponsePayload,
    },

    #[error("{message} (code {code:?})")]
    Generic {
        code: String,
        message: String,
        http_status: Option<u16>,
        payload: ResponsePayload,
    },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStatus { .. } => ErrorKind::InvalidStatus,
            Self::NoOpTransition { .. } => ErrorKind::NoOpTransition,
            Self::TerminalStateViolation { .. } => ErrorKind::TerminalStateViolation,
            Self::ForbiddenTransition { .. } => ErrorKind::ForbiddenTransition,
            Self::NoOpTransitionReported { .. } => ErrorKind::NoOpTransitionReported,
            Self::TerminalStateViolationReported { .. } => {
                ErrorKind::TerminalStateViolationReported
            }
            Self::ForbiddenTransitionReported { .. } => ErrorKind::ForbiddenTransitionReported,
            Self::DeduplicationIdConflict { .. } => ErrorKind::DeduplicationIdConflict,
            Self::Generic { .. } => ErrorKind::Generic,
        }
    }

    /// Human-readable message. For server errors this is the server's own
    /// message when it sent one.
    pub fn message(&self) -> String {
        match self {
            Self::NoOpTransitionReported { message, .. }
            | Self::TerminalStateViolationReported { message, .. }
            | Self::ForbiddenTransitionReported { message, .. }
            | Self::DeduplicationIdConflict { message, .. }
            | Self::Generic { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }

    /// The raw server response; `None` for errors detected locally.
    pub fn payload(&self) -> Option<&ResponsePayload> {
        match self {
            Self::NoOpTransitionReported { payload, .. }
            | Self::TerminalStateViolationReported { payload, .. }
            | Self::ForbiddenTransitionReported { payload, .. }
            | Self::DeduplicationIdConflict { payload, .. }
            | Self::Generic { payload, .. } => Some(payload),
            Self::InvalidStatus { .. }
            | Self::NoOpTransition { .. }
            | Self::TerminalStateViolation { .. }
            | Self::ForbiddenTransition { .. } => None,
        }
    }
}
