use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::{Transport, TransportError};
use super::types::{EnqueueRequest, StatusUpdate};
use crate::config::ClientConfig;
use crate::error::{Error, RemoteFailure, ResponsePayload};
use crate::state_machine::{Job, JobStatus};

// Stored in the payload when an error response body cannot be read.
const UNREADABLE_BODY: &str = "unknown error";

/// [`Transport`] over the job service's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport with default timeouts and no credentials
    /// (useful for testing).
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::from_config(&ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// Fails with [`Error::Config`] when `base_url` is not an absolute
    /// http(s) URL that can take path segments.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(TransportError::from)?;
        let api_key = Some(config.api_key.clone()).filter(|key| !key.is_empty());
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends each segment to the base path, percent-encoding it, so a job id
    /// containing `/`, `?` or `#` stays a single segment. Empty and dot
    /// segments would address another resource and are refused.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(TransportError::InvalidJobId(bad.to_string()));
        }
        let mut url = self.base_url.clone();
        // Base URLs that cannot take segments are rejected in `from_config`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| Error::Config(format!("invalid base_url {raw:?}: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "base_url {raw:?} must be an http or https URL"
        )));
    }
    Ok(url)
}

impl Transport for HttpTransport {
    async fn submit_transition(
        &self,
        job_id: &str,
        target: JobStatus,
    ) -> Result<JobStatus, TransportError> {
        tracing::debug!(job_id, target = %target, "submitting status transition");
        let response = self
            .authorize(self.client.put(self.endpoint(&["jobs", job_id, "status"])?))
            .json(&StatusUpdate { status: target })
            .send()
            .await?;
        let confirmed: StatusUpdate = read_json(response).await?;
        Ok(confirmed.status)
    }

    async fn fetch_job(&self, job_id: &str) -> Result<Job, TransportError> {
        let response = self
            .authorize(self.client.get(self.endpoint(&["jobs", job_id])?))
            .send()
            .await?;
        read_json(response).await
    }

    async fn enqueue(&self, request: &EnqueueRequest) -> Result<Job, TransportError> {
        tracing::debug!(
            name = %request.name,
            deduplication_id = %request.deduplication_id,
            "enqueueing job"
        );
        let response = self
            .authorize(self.client.post(self.endpoint(&["jobs"])?))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();

    if !status.is_success() {
        let text = response
            .text()
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    http_status = status.as_u16(),
                    error = %e,
                    "failed to read error response body"
                );
            })
            .ok();
        return Err(remote_failure(status.as_u16(), text).into());
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

/// Builds a [`RemoteFailure`] from an error response body. JSON objects are
/// kept as-is; any other body is stored under `"body"`, and an unreadable one
/// (`None`) as [`UNREADABLE_BODY`].
fn remote_failure(http_status: u16, text: Option<String>) -> RemoteFailure {
    let text = text.unwrap_or_else(|| UNREADABLE_BODY.to_string());
    let payload = match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = ResponsePayload::new();
            map.insert("body".to_string(), Value::String(text));
            map
        }
    };
    let code = payload
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    tracing::debug!(http_status, code = %code, "job service returned an error");

    RemoteFailure {
        code,
        http_status,
        payload,
    }
}
