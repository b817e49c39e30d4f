//! Request and response bodies for the job service HTTP API.

use serde::{Deserialize, Serialize};

use crate::state_machine::{DeduplicationId, JobStatus};
use crate::variables::VariableCollection;

/// Body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueRequest {
    pub name: String,
    pub deduplication_id: DeduplicationId,
    #[serde(default)]
    pub variables: VariableCollection,
}

impl EnqueueRequest {
    /// A request with a freshly generated deduplication id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_deduplication_id(name, DeduplicationId::generate())
    }

    pub fn with_deduplication_id(name: impl Into<String>, id: impl Into<DeduplicationId>) -> Self {
        Self {
            name: name.into(),
            deduplication_id: id.into(),
            variables: VariableCollection::new(),
        }
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.add(name, value);
        self
    }
}

/// Body of `PUT /jobs/{id}/status`, in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
}
