//! API contract definitions.
//!
//! This module contains the trait definitions and type signatures that define
//! the API surface. These are independent of any particular implementation.

use crate::github::{self, AccessToken, UserProfile};
use crate::pages;
use dropshot::{Body, HttpError, HttpResponseOk, Query, RequestContext};
use http::{Response, StatusCode, header};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use url::Url;

/// Response from `/api/health`
#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    /// Health status (always `"ok"`).
    ///
    /// This indicates that the server is up and nothing more.
    pub status: String,
}

/// Response from `/api/version`
#[derive(Debug, Serialize, JsonSchema)]
pub struct VersionResponse {
    /// Version string from git describe.
    pub version: String,
}

/// Parameters for `/callbacks/github`
///
/// GitHub sends either `code`, or `error` if the user did not grant access.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CallbackParams {
    /// The one-time authorization code from GitHub.
    pub code: Option<String>,

    /// OAuth error code, e.g. `access_denied`.
    pub error: Option<String>,

    /// Human readable explanation of `error`.
    pub error_description: Option<String>,
}

/// Base trait defining the business logic for the API.
///
/// This trait contains the actual implementation methods that handle
/// the business logic for each endpoint. Implement this trait to provide
/// custom behavior (e.g., for testing with mocks).
pub trait ApiBase: Send + Sync {
    /// Check that the server is up.
    ///
    /// If the server is up, this always returns `{"status":"ok"}`. It
    /// intentionally does not check anything else, including GitHub.
    fn check_health(&self) -> impl Future<Output = String> + Send;

    /// Get the application version.
    fn get_version(&self) -> impl Future<Output = String> + Send;

    /// GitHub’s authorization URL with our `client_id`.
    fn authorize_url(&self) -> Url;

    /// Exchange a GitHub OAuth code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth exchange fails.
    fn exchange_code_for_token(
        &self,
        code: &str,
        log: &slog::Logger,
    ) -> impl Future<Output = github::Result<AccessToken>> + Send;

    /// Fetch the profile of the user who owns `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if GitHub does not return a profile.
    fn fetch_user_profile(
        &self,
        token: &AccessToken,
        log: &slog::Logger,
    ) -> impl Future<Output = github::Result<UserProfile>> + Send;
}

/// API trait with endpoint definitions.
///
/// This trait defines the HTTP API surface using Dropshot’s endpoint
/// attributes. The default implementations delegate to the `ApiBase` trait,
/// allowing for multiple implementations (production, test, mock, etc.).
#[dropshot::api_description]
pub trait LoginApi {
    /// The context type must implement `ApiBase`.
    type Context: ApiBase;

    /// Handle `/`
    ///
    /// Shows a link that sends the browser to GitHub to approve access.
    #[endpoint {
        method = GET,
        path = "/",
    }]
    async fn index(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<Response<Body>, HttpError> {
        html_response(
            StatusCode::OK,
            pages::index(&rqctx.context().authorize_url()),
        )
    }

    /// Handle `/callbacks/github`
    ///
    /// GitHub redirects the browser here after the user approves access.
    #[endpoint {
        method = GET,
        path = "/callbacks/github",
    }]
    async fn github_callback(
        rqctx: RequestContext<Self::Context>,
        query: Query<CallbackParams>,
    ) -> Result<Response<Body>, HttpError> {
        let log = &rqctx.log;
        let params = query.into_inner();

        if let Some(error) = params.error {
            slog::info!(log, "GitHub authorization failed: {error}");
            let message = params.error_description.unwrap_or_else(|| {
                format!("GitHub did not authorize the login ({error}).")
            });
            return html_response(
                StatusCode::BAD_REQUEST,
                pages::error(StatusCode::BAD_REQUEST, &message),
            );
        }

        let code = params.code.unwrap_or_default();
        match complete_login(rqctx.context(), &code, log).await {
            Ok(profile) => {
                slog::info!(log, "Logged in {}", profile.login());
                html_response(StatusCode::OK, pages::dashboard(&profile))
            }
            Err(error) => {
                slog::warn!(log, "Login failed: {error}");
                let status = error.status_code();
                html_response(
                    status,
                    pages::error(status, &error.user_message()),
                )
            }
        }
    }

    /// Handle `/api/health`
    #[endpoint {
        method = GET,
        path = "/api/health",
    }]
    async fn health_check(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<HealthResponse>, HttpError> {
        let status = rqctx.context().check_health().await;
        Ok(HttpResponseOk(HealthResponse { status }))
    }

    /// Handle `/api/version`
    #[endpoint {
        method = GET,
        path = "/api/version",
    }]
    async fn version(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<VersionResponse>, HttpError> {
        let version = rqctx.context().get_version().await;
        Ok(HttpResponseOk(VersionResponse { version }))
    }
}

/// Exchange the code, then use the token to fetch the profile.
///
/// The second step needs the result of the first, so these always run in
/// order.
///
/// # Errors
///
/// Returns the first error encountered.
async fn complete_login<C: ApiBase>(
    context: &C,
    code: &str,
    log: &slog::Logger,
) -> github::Result<UserProfile> {
    if code.is_empty() {
        return Err(github::Error::MissingCode);
    }

    let token = context.exchange_code_for_token(code, log).await?;
    context.fetch_user_profile(&token, log).await
}

/// Build an HTML response.
///
/// # Errors
///
/// Returns an internal server error if the response can’t be built.
fn html_response(
    status: StatusCode,
    html: String,
) -> Result<Response<Body>, HttpError> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-store")
        .body(html.into())
        .map_err(|error| HttpError::for_internal_error(error.to_string()))
}
