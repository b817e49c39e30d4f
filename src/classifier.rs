//! Maps server error codes onto [`ClientError`] kinds.
//!
//! Classification is total: any code and any payload produce an error value,
//! and the raw payload is always kept. A status code whose status fields are
//! missing or unreadable degrades to [`ClientError::Generic`].

use serde_json::Value;

use crate::error::{ClientError, RemoteFailure, ResponsePayload};
use crate::state_machine::{JobStatus, TransitionTable};

pub const DEDUPLICATION_ID_CONFLICT: &str = "dbDeduplicationIdConflict";
pub const STATUS_TARGET_EQUALS_CURRENT: &str = "statusTargetEqualsCurrent";
pub const STATUS_TERMINAL: &str = "statusTerminal";
pub const STATUS_TRANSITION_FORBIDDEN: &str = "statusTransitionForbidden";

const MESSAGE: &str = "message";
const DEDUPLICATION_ID: &str = "deduplicationId";
const JOB_ID: &str = "jobId";
const CURRENT_STATUS: &str = "currentStatus";
const TARGET_STATUS: &str = "targetStatus";

pub struct ClientErrorClassifier;

impl ClientErrorClassifier {
    /// Classify a server error code against the built-in transition table.
    pub fn classify(code: &str, payload: ResponsePayload) -> ClientError {
        Self::classify_with(TransitionTable::standard(), code, payload, None)
    }

    /// Classify a transport failure, keeping its HTTP status for
    /// [`ClientError::Generic`].
    pub fn classify_failure(failure: RemoteFailure) -> ClientError {
        Self::classify_failure_with(TransitionTable::standard(), failure)
    }

    pub fn classify_failure_with(table: &TransitionTable, failure: RemoteFailure) -> ClientError {
        let RemoteFailure {
            code,
            http_status,
            payload,
        } = failure;
        Self::classify_with(table, &code, payload, Some(http_status))
    }

    /// `table` is only consulted to warn when the server disagrees with the
    /// local rules; it never changes the resulting kind.
    pub fn classify_with(
        table: &TransitionTable,
        code: &str,
        payload: ResponsePayload,
        http_status: Option<u16>,
    ) -> ClientError {
        let message = string_field(&payload, MESSAGE);
        let current = status_field(&payload, CURRENT_STATUS);
        let target = status_field(&payload, TARGET_STATUS);

        let classified = match (code, current, target) {
            (DEDUPLICATION_ID_CONFLICT, _, _) => ClientError::DeduplicationIdConflict {
                deduplication_id: string_field(&payload, DEDUPLICATION_ID),
                existing_job_id: string_field(&payload, JOB_ID),
                message: message.unwrap_or_else(|| "deduplication id already in use".to_string()),
                payload,
            },
            (STATUS_TARGET_EQUALS_CURRENT, Some(current), Some(target)) => {
                if current != target {
                    warn_drift(code, current, target);
                }
                ClientError::NoOpTransitionReported {
                    current,
                    target,
                    message: message.unwrap_or_else(|| format!("job is already {target}")),
                    payload,
                }
            }
            (STATUS_TERMINAL, Some(current), _) => {
                if !current.is_terminal() || table.targets(current).next().is_some() {
                    warn_drift(code, current, target.unwrap_or(current));
                }
                ClientError::TerminalStateViolationReported {
                    current,
                    message: message
                        .unwrap_or_else(|| format!("job is in terminal status {current}")),
                    payload,
                }
            }
            (STATUS_TRANSITION_FORBIDDEN, Some(current), Some(target)) => {
                if table.allows(current, target) {
                    warn_drift(code, current, target);
                }
                ClientError::ForbiddenTransitionReported {
                    current,
                    target,
                    message: message.unwrap_or_else(|| {
                        format!("transition from {current} to {target} is not allowed")
                    }),
                    payload,
                }
            }
            _ => ClientError::Generic {
                code: code.to_string(),
                message: message.unwrap_or_else(|| generic_message(code)),
                http_status,
                payload,
            },
        };

        tracing::debug!(code, kind = ?classified.kind(), "classified server error");
        classified
    }
}

fn generic_message(code: &str) -> String {
    if code.is_empty() {
        "request failed".to_string()
    } else {
        format!("request failed with code {code}")
    }
}

fn warn_drift(code: &str, current: JobStatus, target: JobStatus) {
    tracing::warn!(
        code,
        current = %current,
        target = %target,
        "server rejected a transition the local table disagrees with"
    );
}

// Ids may arrive as JSON numbers; anything else is treated as absent.
fn string_field(payload: &ResponsePayload, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn status_field(payload: &ResponsePayload, key: &str) -> Option<JobStatus> {
    payload.get(key)?.as_str()?.parse().ok()
}
