//! Mock implementation of the API for testing.

use super::definition::{ApiBase, LoginApi};
use crate::config::Endpoints;
use crate::github::{self, AccessToken, UserProfile};
use http::StatusCode;
use serde_json::json;
use url::Url;

/// Mock state for testing that returns predefined responses.
#[derive(Clone, Debug)]
pub struct MockAppState {
    /// The health status to return.
    pub health_status: String,
    /// The client ID to put in the authorization URL.
    pub client_id: String,
    /// The access token to return from the code exchange.
    pub mock_access_token: Option<String>,
    /// The profile to return for `mock_access_token`.
    pub mock_profile: serde_json::Value,
    /// OAuth error code to return from the code exchange (if Some).
    pub mock_oauth_error: Option<String>,
    /// Message to reject the token with when fetching the profile (if Some).
    pub mock_profile_error: Option<String>,
}

impl MockAppState {
    /// Create a new mock state with successful defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            health_status: "ok".to_owned(),
            client_id: "mock_client_id".to_owned(),
            mock_access_token: Some("mock_token_12345".to_owned()),
            mock_profile: json!({
                "login": "octocat",
                "id": 1,
                "name": "The Octocat",
            }),
            mock_oauth_error: None,
            mock_profile_error: None,
        }
    }

    /// Create a mock state that simulates a rejected authorization code.
    #[must_use]
    pub fn with_oauth_error(error: String) -> Self {
        Self {
            mock_access_token: None,
            mock_oauth_error: Some(error),
            ..Self::new()
        }
    }

    /// Create a mock state that simulates a rejected access token.
    #[must_use]
    pub fn with_profile_error(message: String) -> Self {
        Self { mock_profile_error: Some(message), ..Self::new() }
    }
}

impl Default for MockAppState {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiBase for MockAppState {
    async fn check_health(&self) -> String {
        self.health_status.clone()
    }

    async fn get_version(&self) -> String {
        env!("GIT_VERSION").to_owned()
    }

    fn authorize_url(&self) -> Url {
        let mut url = Endpoints::default().authorize;
        url.query_pairs_mut().append_pair("client_id", &self.client_id);
        url
    }

    async fn exchange_code_for_token(
        &self,
        _code: &str,
        _log: &slog::Logger,
    ) -> github::Result<AccessToken> {
        if let Some(error) = &self.mock_oauth_error {
            return Err(github::Error::RejectedCode {
                error: error.clone(),
                description: None,
            });
        }

        self.mock_access_token.clone().map(AccessToken::new).ok_or_else(|| {
            github::Error::MalformedResponse("No token configured".to_owned())
        })
    }

    async fn fetch_user_profile(
        &self,
        token: &AccessToken,
        _log: &slog::Logger,
    ) -> github::Result<UserProfile> {
        if let Some(message) = &self.mock_profile_error {
            return Err(github::Error::RejectedToken {
                status: StatusCode::UNAUTHORIZED,
                message: message.clone(),
            });
        }

        if self.mock_access_token.as_deref() != Some(token.expose()) {
            return Err(github::Error::RejectedToken {
                status: StatusCode::UNAUTHORIZED,
                message: "Bad credentials".to_owned(),
            });
        }

        UserProfile::from_value(self.mock_profile.clone())
            .map_err(github::Error::MalformedResponse)
    }
}

/// Mock implementation type for the `LoginApi` trait.
pub enum MockApiImpl {}

impl LoginApi for MockApiImpl {
    type Context = MockAppState;
}
