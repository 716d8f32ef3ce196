//! Drive the whole login through a running server.

use super::{CLIENT_ID, TestServer, mock_config};
use crate::api::mock::{MockApiImpl, MockAppState};
use crate::api::{AppState, LoginApiImpl};
use assert2::assert;
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::json;

/// Start the production API against a mock GitHub.
fn start_with_github(github: &MockServer) -> TestServer<AppState> {
    let state = AppState::new(mock_config(github)).unwrap();
    TestServer::start::<LoginApiImpl>(state)
}

#[tokio::test]
async fn index_links_to_github_with_client_id() {
    let github = MockServer::start_async().await;
    let server = start_with_github(&github);

    let (status, body) = server.get("/").await;
    assert!(status == StatusCode::OK);
    assert!(body.contains(&format!(
        "{}?client_id={CLIENT_ID}",
        github.url("/login/oauth/authorize")
    )));

    server.close().await;
}

#[tokio::test]
async fn callback_renders_profile() {
    let github = MockServer::start_async().await;
    let token_mock = github
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login/oauth/access_token")
                .body_contains("code=validcode");
            then.status(200).json_body(json!({"access_token": "abc123"}));
        })
        .await;
    let user_mock = github
        .mock_async(|when, then| {
            when.method(GET)
                .path("/user")
                .header("authorization", "Bearer abc123");
            then.status(200).json_body(json!({"login": "octocat", "id": 1}));
        })
        .await;
    let server = start_with_github(&github);

    let (status, body) = server.get("/callbacks/github?code=validcode").await;
    assert!(status == StatusCode::OK);
    assert!(body.contains("octocat"));
    assert!(!body.contains("abc123"));

    token_mock.assert_async().await;
    user_mock.assert_async().await;
    server.close().await;
}

#[tokio::test]
async fn expired_code_is_client_error() {
    let github = MockServer::start_async().await;
    github
        .mock_async(|when, then| {
            when.method(POST).path("/login/oauth/access_token");
            then.status(200).json_body(json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired.",
            }));
        })
        .await;
    let user_mock = github
        .mock_async(|when, then| {
            when.method(GET).path("/user");
            then.status(200).json_body(json!({"login": "octocat"}));
        })
        .await;
    let server = start_with_github(&github);

    let (status, body) = server.get("/callbacks/github?code=expiredcode").await;
    assert!(status == StatusCode::BAD_REQUEST);
    assert!(body.contains("The code passed is incorrect or expired."));
    assert!(user_mock.hits_async().await == 0);

    server.close().await;
}

#[tokio::test]
async fn revoked_token_is_not_rendered_as_profile() {
    let github = MockServer::start_async().await;
    github
        .mock_async(|when, then| {
            when.method(POST).path("/login/oauth/access_token");
            then.status(200).json_body(json!({"access_token": "revoked"}));
        })
        .await;
    github
        .mock_async(|when, then| {
            when.method(GET).path("/user");
            then.status(401).json_body(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest",
            }));
        })
        .await;
    let server = start_with_github(&github);

    let (status, body) = server.get("/callbacks/github?code=validcode").await;
    assert!(status == StatusCode::BAD_GATEWAY);
    assert!(!body.contains("documentation_url"));

    server.close().await;
}

#[tokio::test]
async fn unreachable_github_is_gateway_error() {
    let github = MockServer::start_async().await;
    let mut config = mock_config(&github);
    config.endpoints.token =
        "http://127.0.0.1:1/login/oauth/access_token".parse().unwrap();
    let server =
        TestServer::start::<LoginApiImpl>(AppState::new(config).unwrap());

    let (status, _) = server.get("/callbacks/github?code=validcode").await;
    assert!(status == StatusCode::BAD_GATEWAY);

    server.close().await;
}

#[tokio::test]
async fn missing_code_is_client_error() {
    let server = TestServer::start::<MockApiImpl>(MockAppState::new());

    let (status, _) = server.get("/callbacks/github").await;
    assert!(status == StatusCode::BAD_REQUEST);

    let (status, _) = server.get("/callbacks/github?code=").await;
    assert!(status == StatusCode::BAD_REQUEST);

    server.close().await;
}

#[tokio::test]
async fn denied_access_is_client_error() {
    let server = TestServer::start::<MockApiImpl>(MockAppState::new());

    let (status, body) = server
        .get(
            "/callbacks/github?error=access_denied\
            &error_description=The+user+has+denied+your+application+access.",
        )
        .await;
    assert!(status == StatusCode::BAD_REQUEST);
    assert!(body.contains("The user has denied your application access."));

    server.close().await;
}

#[tokio::test]
async fn mock_flow_renders_profile() {
    let server = TestServer::start::<MockApiImpl>(MockAppState::new());

    let (status, body) = server.get("/").await;
    assert!(status == StatusCode::OK);
    assert!(body.contains("client_id=mock_client_id"));

    let (status, body) = server.get("/callbacks/github?code=anything").await;
    assert!(status == StatusCode::OK);
    assert!(body.contains("The Octocat (octocat)"));

    server.close().await;
}

#[tokio::test]
async fn mock_rejected_code() {
    let server = TestServer::start::<MockApiImpl>(
        MockAppState::with_oauth_error("bad_verification_code".to_owned()),
    );

    let (status, _) = server.get("/callbacks/github?code=expiredcode").await;
    assert!(status == StatusCode::BAD_REQUEST);

    server.close().await;
}

#[tokio::test]
async fn mock_rejected_token() {
    let server = TestServer::start::<MockApiImpl>(
        MockAppState::with_profile_error("Bad credentials".to_owned()),
    );

    let (status, _) = server.get("/callbacks/github?code=code").await;
    assert!(status == StatusCode::BAD_GATEWAY);

    server.close().await;
}

#[tokio::test]
async fn health_and_version() {
    let server = TestServer::start::<MockApiImpl>(MockAppState::new());

    let (status, body) = server.get("/api/health").await;
    assert!(status == StatusCode::OK);
    assert!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap()
            == json!({"status": "ok"})
    );

    let (status, body) = server.get("/api/version").await;
    assert!(status == StatusCode::OK);
    assert!(body.contains(env!("GIT_VERSION")));

    server.close().await;
}
