use jobflow_client::{
    ClientConfig, ClientError, DeduplicationId, EnqueueRequest, Enqueued, Error, ErrorKind,
    HttpTransport, JobClient, JobStatus, Transport, TransitionOutcome, TransportError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> JobClient<HttpTransport> {
    let config = ClientConfig {
        base_url: format!("{}/", server.uri()),
        api_key: "test-key".to_string(),
        ..ClientConfig::default()
    };
    JobClient::from_config(&config).unwrap()
}

fn job_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": status,
        "variables": [],
        "createdAt": "2026-03-01T10:00:00Z",
        "updatedAt": "2026-03-01T10:00:00Z"
    })
}

#[tokio::test]
async fn transition_sends_status_update() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/jobs/job_1/status"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({"status": "waiting"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "waiting"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client
        .transition("job_1", JobStatus::Created, JobStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(status, JobStatus::Waiting);
}

#[tokio::test]
async fn job_id_with_reserved_characters_stays_in_its_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/jobs/job"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "waiting"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/jobs/job%231/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "waiting"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client
        .transition("job#1", JobStatus::Created, JobStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(status, JobStatus::Waiting);
}

#[tokio::test]
async fn dot_job_id_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("jobs", "created")))
        .expect(0)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri()).unwrap();
    let err = transport.fetch_job("..").await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidJobId(_)));
}

#[test]
fn bad_base_url_is_config_error() {
    let config = ClientConfig {
        base_url: "jobs.example.com/api".to_string(),
        ..ClientConfig::default()
    };
    let err = JobClient::from_config(&config).err().unwrap();
    assert!(matches!(err, Error::Config(_)), "{err}");
    assert_eq!(err.kind(), None);
}

#[tokio::test]
async fn rejected_transition_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "waiting"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .transition("job_1", JobStatus::Processing, JobStatus::Waiting)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ForbiddenTransition));
}

#[tokio::test]
async fn server_forbidden_transition_is_typed() {
    let server = MockServer::start().await;

    let body = json!({
        "code": "statusTransitionForbidden",
        "message": "job is paused by an operator",
        "currentStatus": "waiting",
        "targetStatus": "processing"
    });
    Mock::given(method("PUT"))
        .and(path("/jobs/job_2/status"))
        .respond_with(ResponseTemplate::new(409).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .transition("job_2", JobStatus::Waiting, JobStatus::Processing)
        .await
        .unwrap_err();

    let client_err = err.client_error().unwrap();
    assert_eq!(client_err.kind(), ErrorKind::ForbiddenTransitionReported);
    assert!(client_err.kind().requires_refresh());
    assert_eq!(client_err.message(), "job is paused by an operator");
    assert_eq!(
        client_err.payload(),
        Some(body.as_object().unwrap())
    );
}

#[tokio::test]
async fn unknown_server_error_keeps_http_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .transition("job_3", JobStatus::Waiting, JobStatus::Cancelled)
        .await
        .unwrap_err();

    match err.client_error() {
        Some(ClientError::Generic {
            code,
            http_status,
            payload,
            ..
        }) => {
            assert_eq!(code, "");
            assert_eq!(*http_status, Some(503));
            assert_eq!(payload["body"], "upstream unavailable");
        }
        other => panic!("expected Generic, got {other:?}"),
    }
}

#[tokio::test]
async fn enqueue_creates_job() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jobs"))
        .and(body_json(json!({
            "name": "thumbnail",
            "deduplicationId": "img-77",
            "variables": [{"name": "size", "value": "128"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_json("job_77", "created")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = EnqueueRequest::with_deduplication_id("thumbnail", "img-77").variable("size", "128");
    match client.enqueue(&request).await.unwrap() {
        Enqueued::Created(job) => {
            assert_eq!(job.id, "job_77");
            assert_eq!(job.status, JobStatus::Created);
        }
        other => panic!("expected Created, got {other:?}"),
    }
}

#[tokio::test]
async fn enqueue_duplicate_returns_existing_job() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "dbDeduplicationIdConflict",
            "message": "deduplication id img-77 already used",
            "deduplicationId": "img-77",
            "jobId": "job_77"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = EnqueueRequest::with_deduplication_id("thumbnail", "img-77");
    let outcome = client.enqueue(&request).await.unwrap();
    assert_eq!(
        outcome,
        Enqueued::Existing {
            deduplication_id: DeduplicationId::new("img-77"),
            job_id: Some("job_77".to_string()),
        }
    );
}

#[tokio::test]
async fn refresh_and_transition_reads_current_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs/job_5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("job_5", "processing")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/jobs/job_5/status"))
        .and(body_json(json!({"status": "success"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .refresh_and_transition("job_5", JobStatus::Success)
        .await
        .unwrap();
    assert_eq!(outcome, TransitionOutcome::Changed(JobStatus::Success));
}

#[tokio::test]
async fn refresh_of_finished_job_is_terminal_violation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs/job_6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("job_6", "error")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .refresh_and_transition("job_6", JobStatus::Processing)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TerminalStateViolation));
}

#[tokio::test]
async fn undecodable_success_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs/job_8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "finished"})))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri()).unwrap();
    let err = transport.fetch_job("job_8").await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Port 9 (discard) is not served in the test environment.
    let transport = HttpTransport::new("http://127.0.0.1:9").unwrap();
    let err = transport
        .submit_transition("job_9", JobStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}
