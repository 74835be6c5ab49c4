use pulse_backend::models::{JobStatus, PublishRequest};
use pulse_backend::{Backend, BackendError, HttpBackend};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.uri(), Some("secret".to_string())).unwrap()
}

#[tokio::test]
async fn overview_sends_bearer_and_decodes_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tokens": [
                {"platform": "facebook", "accountId": "1", "expiresAt": "2030-01-01T00:00:00Z"},
                {"platform": "crm", "accountId": "loc", "timeUntilExpirySeconds": -5}
            ],
            "stats": {"postsPublished": 4}
        })))
        .mount(&server)
        .await;

    let overview = backend(&server).overview().await.unwrap();
    assert_eq!(overview.tokens.len(), 2);
    assert_eq!(overview.tokens[1].time_until_expiry_seconds, Some(-5.0));
    assert_eq!(overview.numeric_stats(), vec![("postsPublished", 4.0)]);
}

#[tokio::test]
async fn refresh_posts_platform_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tokens/refresh"))
        .and(body_json(json!({"platform": "instagram"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refreshed": [{"platform": "instagram", "accountId": "ig"}],
            "failed": [{"platform": "instagram", "accountId": "old", "error": "revoked"}]
        })))
        .mount(&server)
        .await;

    let outcome = backend(&server)
        .refresh_tokens(Some("instagram"))
        .await
        .unwrap();
    assert_eq!(outcome.refreshed.len(), 1);
    assert_eq!(outcome.failed[0].error, "revoked");
}

#[tokio::test]
async fn throttled_requests_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scheduler/status"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/scheduler/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"running": true})))
        .mount(&server)
        .await;

    let status = backend(&server).scheduler_status().await.unwrap();
    assert!(status.running);
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs/job-9/cancel"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let err = backend(&server).cancel_job("job-9").await.unwrap_err();
    assert!(err.is_unauthorized());
    match err {
        BackendError::Status { body, .. } => assert_eq!(body, "token expired"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = backend(&server).jobs().await.unwrap_err();
    assert!(matches!(err, BackendError::Decode { .. }));
}

#[tokio::test]
async fn schedule_and_jobs_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/posts/schedule"))
        .and(body_json(json!({
            "content": "hi",
            "platforms": ["linkedin"],
            "scheduledAt": "2030-01-01T09:00:00Z"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"jobId": "j1", "status": "scheduled"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "j1", "status": "scheduled", "platforms": ["linkedin"]}
        ])))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let response = backend
        .schedule(&PublishRequest {
            content: "hi".to_string(),
            platforms: vec!["linkedin".to_string()],
            media_urls: Vec::new(),
            scheduled_at: Some("2030-01-01T09:00:00Z".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.job_id.as_deref(), Some("j1"));

    let jobs = backend.jobs().await.unwrap();
    assert_eq!(jobs[0].status, JobStatus::Scheduled);
}

#[tokio::test]
async fn disconnect_uses_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/social/twitter/accounts/acct-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server)
        .disconnect_account("twitter", "acct-1")
        .await
        .unwrap();
}
