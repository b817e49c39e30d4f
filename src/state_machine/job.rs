use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::JobStatus;
use crate::variables::VariableCollection;

/// Caller-supplied key the server uses to detect duplicate submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeduplicationId(String);

impl DeduplicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeduplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeduplicationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DeduplicationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A job as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication_id: Option<DeduplicationId>,
    #[serde(default)]
    pub variables: VariableCollection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = DeduplicationId::generate();
        let b = DeduplicationId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn deduplication_id_is_transparent() {
        let id = DeduplicationId::from("order-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""order-42""#);
        assert_eq!(id.to_string(), "order-42");
    }

    #[test]
    fn job_deserialize_from_api_format() {
        let api_json = r#"{
            "id": "job_1",
            "status": "success",
            "deduplicationId": "order-42",
            "variables": [{"name": "out", "value": "ok"}],
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:05:00Z"
        }"#;
        let job: Job = serde_json::from_str(api_json).unwrap();
        assert_eq!(job.id, "job_1");
        assert_eq!(job.status, JobStatus::Success);
        assert_eq!(job.deduplication_id, Some(DeduplicationId::new("order-42")));
        assert_eq!(job.variables.get("out"), Some("ok"));
        assert!(job.is_finished());
        assert!(job.updated_at > job.created_at);
    }

    #[test]
    fn job_without_optional_fields() {
        let json = r#"{
            "id": "job_2",
            "status": "waiting",
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:04:05Z"
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert!(job.deduplication_id.is_none());
        assert!(job.variables.is_empty());
        assert!(!job.is_finished());

        let out = serde_json::to_string(&job).unwrap();
        assert!(!out.contains("deduplicationId"));
    }

    #[test]
    fn job_with_unknown_status_is_rejected() {
        let json = r#"{
            "id": "job_3",
            "status": "paused",
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:04:05Z"
        }"#;
        let err = serde_json::from_str::<Job>(json).unwrap_err();
        assert!(err.to_string().contains(r#"invalid job status: "paused""#), "{err}");
    }
}
