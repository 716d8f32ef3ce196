//! Client for the two GitHub calls made during a login.

use super::{AccessToken, Error, Result, UserProfile};
use crate::config::{Config, Credentials, Endpoints};
use http::StatusCode;
use reqwest::header;
use serde::{Deserialize, Serialize};
use url::Url;

/// `User-Agent` sent to GitHub. The REST API refuses requests without one.
const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// REST API version we were written against.
const API_VERSION: &str = "2022-11-28";

/// Exchanges authorization codes for tokens and tokens for profiles.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    /// HTTP client for making requests to GitHub.
    http_client: reqwest::Client,
    /// The OAuth application credentials.
    credentials: Credentials,
    /// Where to send requests.
    endpoints: Endpoints,
    /// `GET /user` under the API base.
    user_url: Url,
}

/// A request to <https://github.com/login/oauth/access_token>
#[derive(Debug, Serialize)]
struct GitHubTokenRequest<'a> {
    /// The GitHub client ID for OAuth.
    client_id: &'a str,
    /// The GitHub client secret for OAuth.
    client_secret: &'a str,
    /// The code from GitHub.
    code: &'a str,
}

/// A response from <https://github.com/login/oauth/access_token>
#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    /// The access token if the request was successful.
    access_token: Option<String>,
    /// The error code if the request failed.
    error: Option<String>,
    /// The error message if the request failed.
    error_description: Option<String>,
}

/// An error from the GitHub REST API, e.g. `{"message":"Bad credentials"}`.
#[derive(Debug, Deserialize)]
struct GitHubApiError {
    /// What went wrong.
    message: String,
}

impl GitHubClient {
    /// Create a client from the process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] if the HTTP client can’t be initialized, or
    /// [`Error::InvalidEndpoint`] if the API base URL can’t be joined.
    pub fn new(config: &Config) -> Result<Self> {
        let user_url = config
            .endpoints
            .api_url("user")
            .map_err(Error::InvalidEndpoint)?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            http_client,
            credentials: config.credentials.clone(),
            endpoints: config.endpoints.clone(),
            user_url,
        })
    }

    /// Exchange a one-time authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if `code` is empty, if GitHub can’t be reached, or if
    /// GitHub does not return a token. See [`Error`].
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        log: &slog::Logger,
    ) -> Result<AccessToken> {
        if code.is_empty() {
            return Err(Error::MissingCode);
        }

        slog::debug!(log, "Exchanging authorization code for access token");
        let response = self
            .http_client
            .post(self.endpoints.token.clone())
            .header(header::ACCEPT, "application/json")
            .form(&GitHubTokenRequest {
                client_id: self.credentials.client_id(),
                client_secret: self.credentials.client_secret().expose(),
                code,
            })
            .send()
            .await
            .map_err(|error| {
                slog::error!(log, "OAuth request failed: {error}");
                Error::from_request(error)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| {
            slog::error!(log, "Failed to read OAuth response: {error}");
            Error::from_request(error)
        })?;

        // GitHub reports OAuth errors in the body, usually with a 200.
        let token_data =
            serde_json::from_slice::<GitHubTokenResponse>(&body).ok();

        if let Some(GitHubTokenResponse {
            error: Some(error),
            error_description,
            ..
        }) = &token_data
        {
            slog::warn!(log, "Error in OAuth response: {error}");
            return Err(Error::RejectedCode {
                error: error.clone(),
                description: error_description
                    .clone()
                    .filter(|description| !description.is_empty()),
            });
        }

        if !status.is_success() {
            slog::error!(log, "OAuth request returned {status}");
            return Err(Error::UpstreamStatus {
                status,
                message: upstream_message(status, &body),
            });
        }

        token_data
            .ok_or_else(|| {
                slog::error!(log, "Failed to parse OAuth response");
                Error::MalformedResponse("token response is not JSON".to_owned())
            })?
            .access_token
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| {
                slog::error!(log, "No access token in OAuth response");
                Error::MalformedResponse(
                    "no access_token in token response".to_owned(),
                )
            })
    }

    /// Fetch the profile of the user an access token was issued for.
    ///
    /// # Errors
    ///
    /// Returns an error if GitHub can’t be reached, refuses the token, or
    /// returns something other than a user profile. See [`Error`].
    pub async fn fetch_user_profile(
        &self,
        token: &AccessToken,
        log: &slog::Logger,
    ) -> Result<UserProfile> {
        slog::debug!(log, "Fetching user profile");
        let response = self
            .http_client
            .get(self.user_url.clone())
            .bearer_auth(token.expose())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|error| {
                slog::error!(log, "Profile request failed: {error}");
                Error::from_request(error)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| {
            slog::error!(log, "Failed to read profile response: {error}");
            Error::from_request(error)
        })?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
        {
            let message = upstream_message(status, &body);
            slog::warn!(log, "Access token rejected ({status}): {message}");
            return Err(Error::RejectedToken { status, message });
        }

        if !status.is_success() {
            let message = upstream_message(status, &body);
            slog::error!(log, "Profile request returned {status}: {message}");
            return Err(Error::UpstreamStatus { status, message });
        }

        serde_json::from_slice::<serde_json::Value>(&body)
            .map_err(|error| error.to_string())
            .and_then(UserProfile::from_value)
            .map_err(|error| {
                slog::error!(log, "Failed to parse profile response: {error}");
                Error::MalformedResponse(error)
            })
    }
}

/// Get the `message` from a GitHub error body, or fall back to the status.
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<GitHubApiError>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| {
            status.canonical_reason().unwrap_or("Unknown error").to_owned()
        })
}
