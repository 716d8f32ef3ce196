//! Errors encountered while completing a login with GitHub.

use http::StatusCode;
use std::result;

/// `Result` type for `Error`.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors encountered while exchanging a code or fetching a profile.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The callback did not include an authorization code.
    #[error("No authorization code provided")]
    MissingCode,

    /// The HTTP client could not be built.
    #[error("Could not create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The API base URL can’t be used to build request URLs.
    #[error("Invalid GitHub API URL: {0}")]
    InvalidEndpoint(#[source] url::ParseError),

    /// GitHub could not be reached.
    #[error("Request to GitHub failed: {0}")]
    Network(#[source] reqwest::Error),

    /// GitHub did not answer in time.
    #[error("Request to GitHub timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// GitHub refused the authorization code (expired, reused, or invalid).
    #[error("GitHub rejected the authorization code: {error}")]
    RejectedCode {
        /// OAuth error code, e.g. `bad_verification_code`.
        error: String,
        /// Human readable explanation from GitHub.
        description: Option<String>,
    },

    /// GitHub refused the access token when fetching the profile.
    #[error("GitHub rejected the access token ({status}): {message}")]
    RejectedToken {
        /// HTTP status returned by GitHub.
        status: StatusCode,
        /// The `message` field from GitHub.
        message: String,
    },

    /// GitHub responded with an unexpected HTTP status.
    #[error("GitHub returned {status}: {message}")]
    UpstreamStatus {
        /// HTTP status returned by GitHub.
        status: StatusCode,
        /// The `message` field from GitHub, or the status reason.
        message: String,
    },

    /// GitHub responded, but not with what we expected.
    #[error("Unexpected response from GitHub: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// The HTTP status to respond to the browser with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCode | Self::RejectedCode { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Client(_) | Self::InvalidEndpoint(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Network(_)
            | Self::RejectedToken { .. }
            | Self::UpstreamStatus { .. }
            | Self::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// A message that is safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCode => "No authorization code was provided. \
                Please start the login again."
                .to_owned(),
            Self::RejectedCode { description: Some(description), .. } => {
                description.clone()
            }
            Self::RejectedCode { description: None, .. } => {
                "The authorization code was rejected by GitHub. It may have \
                expired or already been used. Please log in again."
                    .to_owned()
            }
            Self::RejectedToken { .. } => {
                "GitHub did not accept the access token. Please log in again."
                    .to_owned()
            }
            Self::Client(_) | Self::InvalidEndpoint(_) => {
                "Internal server error".to_owned()
            }
            Self::Timeout(_) => "GitHub took too long to respond. \
                Please try again."
                .to_owned(),
            Self::Network(_)
            | Self::UpstreamStatus { .. }
            | Self::MalformedResponse(_) => {
                "Service temporarily unavailable".to_owned()
            }
        }
    }

    /// Classify a failed request.
    pub(crate) fn from_request(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn rejected_code_is_client_error() {
        let error = Error::RejectedCode {
            error: "bad_verification_code".to_owned(),
            description: Some("The code passed is incorrect or expired.".to_owned()),
        };
        assert!(error.status_code() == StatusCode::BAD_REQUEST);
        assert!(
            error.user_message() == "The code passed is incorrect or expired."
        );
    }

    #[test]
    fn rejected_token_is_gateway_error() {
        let error = Error::RejectedToken {
            status: StatusCode::UNAUTHORIZED,
            message: "Bad credentials".to_owned(),
        };
        assert!(error.status_code() == StatusCode::BAD_GATEWAY);
        assert!(error.to_string().contains("Bad credentials"));
    }

    #[test]
    fn malformed_response_hides_details_from_user() {
        let error = Error::MalformedResponse("missing access_token".to_owned());
        assert!(!error.user_message().contains("access_token"));
    }
}
