use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Lifecycle stage of a job on the remote service.
///
/// Each job flows through: CREATED → WAITING → PROCESSING → one terminal status.
/// Variants are declared in lifecycle order, so `Ord` follows the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum JobStatus {
    Created,
    Waiting,
    Processing,
    Success,
    Error,
    Cancelled,
    Terminated,
}

impl JobStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Created,
        JobStatus::Waiting,
        JobStatus::Processing,
        JobStatus::Success,
        JobStatus::Error,
        JobStatus::Cancelled,
        JobStatus::Terminated,
    ];

    /// A terminal status admits no further transition.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Error | JobStatus::Cancelled | JobStatus::Terminated
        )
    }

    /// Wire name used by the remote service.
    pub const fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Waiting => "waiting",
            JobStatus::Processing => "processing",
            JobStatus::Success => "success",
            JobStatus::Error => "error",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Terminated => "terminated",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ClientError;

    /// Unknown names fail with [`ClientError::InvalidStatus`]; they are never
    /// mapped to a fallback status.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ClientError::InvalidStatus {
                value: value.to_string(),
            })
    }
}

impl TryFrom<String> for JobStatus {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, <JobStatus as TryFrom<String>>::Error> {
        value.parse()
    }
}
