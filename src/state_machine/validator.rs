use std::fmt;

use crate::error::ClientError;

use super::status::JobStatus;
use super::transitions::TransitionTable;

/// A requested move of one job from `current` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionRequest {
    pub current: JobStatus,
    pub target: JobStatus,
}

impl TransitionRequest {
    pub const fn new(current: JobStatus, target: JobStatus) -> Self {
        Self { current, target }
    }
}

impl fmt::Display for TransitionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.current, self.target)
    }
}

/// Why a transition was rejected locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Target equals current; callers usually treat this as success.
    NoOpTransition,
    /// Current status is terminal.
    TerminalStateViolation,
    /// The pair is missing from the transition table.
    ForbiddenTransition,
}

/// The result of validating a [`TransitionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionVerdict {
    Allowed,
    Rejected(Violation),
}

impl TransitionVerdict {
    pub const fn is_allowed(self) -> bool {
        matches!(self, TransitionVerdict::Allowed)
    }

    /// Turns a rejection into the matching local [`ClientError`].
    pub fn into_result(self, request: TransitionRequest) -> Result<(), ClientError> {
        let TransitionRequest { current, target } = request;
        match self {
            TransitionVerdict::Allowed => Ok(()),
            TransitionVerdict::Rejected(Violation::NoOpTransition) => {
                Err(ClientError::NoOpTransition { status: current })
            }
            TransitionVerdict::Rejected(Violation::TerminalStateViolation) => {
                Err(ClientError::TerminalStateViolation { current, target })
            }
            TransitionVerdict::Rejected(Violation::ForbiddenTransition) => {
                Err(ClientError::ForbiddenTransition { current, target })
            }
        }
    }
}

/// Decides locally whether a status transition may be sent to the server.
pub struct StatusTransitionValidator;

impl StatusTransitionValidator {
    /// Validate against the built-in table.
    pub fn validate(current: JobStatus, target: JobStatus) -> TransitionVerdict {
        Self::validate_with(TransitionTable::standard(), TransitionRequest::new(current, target))
    }

    /// Rules, first match wins:
    ///
    /// 1. `current == target` → `NoOpTransition`
    /// 2. `current` is terminal → `TerminalStateViolation`
    /// 3. pair not in `table` → `ForbiddenTransition`
    /// 4. otherwise `Allowed`
    pub fn validate_with(table: &TransitionTable, request: TransitionRequest) -> TransitionVerdict {
        let TransitionRequest { current, target } = request;

        if current == target {
            TransitionVerdict::Rejected(Violation::NoOpTransition)
        } else if current.is_terminal() {
            TransitionVerdict::Rejected(Violation::TerminalStateViolation)
        } else if !table.allows(current, target) {
            TransitionVerdict::Rejected(Violation::ForbiddenTransition)
        } else {
            TransitionVerdict::Allowed
        }
    }

    /// Validate wire names. An unknown name on either side fails with
    /// [`ClientError::InvalidStatus`] before any rule is evaluated.
    pub fn validate_raw(current: &str, target: &str) -> Result<TransitionVerdict, ClientError> {
        let current: JobStatus = current.parse()?;
        let target: JobStatus = target.parse()?;
        Ok(Self::validate(current, target))
    }
}
