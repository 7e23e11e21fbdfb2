//! The reqwest-backed client against a mock platform API.

use std::sync::{Arc, Mutex};

use httpmock::prelude::*;
use serde_json::{json, Value};

use orgjoin_config::{ApiConfig, AppConfig};
use orgjoin_invites::{
    ActionOutcome, Collaborators, HttpClient, HttpMethod, HttpRequest, InviteResolutionController,
    Navigator, NotificationCategory, Notifier, ReqwestHttpClient, ResolutionState, RouteQuery,
    StaticSession,
};

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::new(&ApiConfig {
        request_timeout_seconds: 2,
        ..ApiConfig::default()
    })
    .expect("client should build")
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Notifier for Recorder {
    fn notify(&self, _category: NotificationCategory, message: &str) {
        self.events.lock().unwrap().push(format!("notify:{message}"));
    }
}

impl Navigator for Recorder {
    fn navigate(&self, path: &str) {
        self.events.lock().unwrap().push(format!("navigate:{path}"));
    }
}

#[tokio::test]
async fn get_sends_bearer_token_and_parses_json() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/members/join")
                .query_param("token", "tok-1")
                .header("Authorization", "Bearer viewer-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "organization_name": "Acme", "email_match": true }));
        })
        .await;

    let response = client()
        .request(HttpRequest {
            method: HttpMethod::Get,
            url: server.url("/organizations/acme/members/join?token=tok-1"),
            body: None,
            bearer_token: Some("viewer-token".into()),
        })
        .await
        .expect("request should succeed");

    mock.assert_async().await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["organization_name"], "Acme");
    assert_eq!(response.failure_message(), None);
}

#[tokio::test]
async fn non_json_error_body_is_kept_as_text() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/organizations/acme/members/invite");
            then.status(502).body("upstream unavailable");
        })
        .await;

    let response = client()
        .request(HttpRequest {
            method: HttpMethod::Delete,
            url: server.url("/organizations/acme/members/invite?invited_id=42"),
            body: Some(json!({})),
            bearer_token: None,
        })
        .await
        .expect("transport should succeed");

    assert_eq!(response.status, 502);
    assert_eq!(response.body, Value::String("upstream unavailable".into()));
    assert_eq!(
        response.failure_message().as_deref(),
        Some("upstream unavailable")
    );
}

#[tokio::test]
async fn empty_body_decodes_as_null() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/organizations/acme/members/join")
                .json_body(json!({}));
            then.status(204);
        })
        .await;

    let response = client()
        .request(HttpRequest {
            method: HttpMethod::Post,
            url: server.url("/organizations/acme/members/join?token=tok-1"),
            body: Some(json!({})),
            bearer_token: None,
        })
        .await
        .expect("request should succeed");

    assert_eq!(response.body, Value::Null);
    assert!(response.is_success());
}

#[tokio::test]
async fn controller_joins_through_reqwest_client() {
    let server = MockServer::start_async().await;
    let validate = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/members/join")
                .query_param("token", "tok-1");
            then.status(200).json_body(json!({
                "organization_name": "Acme",
                "token_does_not_exist": false,
                "email_match": true,
                "authorized_user": true,
                "expired_token": false,
                "invite_id": 42
            }));
        })
        .await;
    let join = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/organizations/acme/members/join")
                .query_param("token", "tok-1");
            then.status(201).json_body(json!({}));
        })
        .await;

    let mut config = AppConfig::default();
    config.api.base_url = server.base_url();
    let recorder = Arc::new(Recorder::default());
    let controller = InviteResolutionController::new(
        &config,
        Collaborators {
            http: Arc::new(client()),
            notifier: recorder.clone(),
            navigator: recorder.clone(),
            session: Arc::new(StaticSession::new(Some("viewer-token".into()))),
        },
    )
    .expect("controller should build");

    let route = RouteQuery::new(Some("acme"), Some("tok-1"));
    assert_eq!(controller.resolve(&route).await, ResolutionState::Actionable);
    assert_eq!(
        controller.accept().await,
        ActionOutcome::Navigated { path: "/".into() }
    );

    validate.assert_async().await;
    join.assert_async().await;
    assert_eq!(
        recorder.events.lock().unwrap().clone(),
        vec!["navigate:/".to_string()]
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let error = client()
        .request(HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/organizations/acme/members/join?token=x".into(),
            body: None,
            bearer_token: None,
        })
        .await
        .expect_err("nothing listens on the discard port");

    assert!(error.to_string().starts_with("http request failed"));
}
