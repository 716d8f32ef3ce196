//! Process-wide configuration.
//!
//! Everything here is built once at startup and then shared read-only by all
//! requests.

use std::fmt;
use std::time::Duration;
use url::Url;

/// Default GitHub OAuth authorization endpoint.
pub const DEFAULT_AUTHORIZE_URL: &str =
    "https://github.com/login/oauth/authorize";

/// Default GitHub OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str =
    "https://github.com/login/oauth/access_token";

/// Default GitHub REST API base.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default timeout for requests to GitHub.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors encountered while building the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required value was absent or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// An endpoint URL could not be parsed.
    #[error("Invalid URL for {name}: {error}")]
    InvalidUrl {
        /// Which endpoint was invalid.
        name: &'static str,
        /// The parse failure.
        error: url::ParseError,
    },
}

/// The OAuth client secret.
///
/// Only ever sent to GitHub. `Debug` does not reveal it.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Get the secret for use in a server-to-server request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

/// OAuth application credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// Public client ID, embedded in the login page.
    client_id: String,
    /// Private client secret.
    client_secret: ClientSecret,
}

impl Credentials {
    /// Validate and wrap the OAuth application credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either value is empty or only
    /// whitespace.
    pub fn new<I, S>(
        client_id: I,
        client_secret: S,
    ) -> Result<Self, ConfigError>
    where
        I: Into<String>,
        S: Into<String>,
    {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(ConfigError::Missing("CLIENT_ID"));
        }

        let client_secret = client_secret.into();
        if client_secret.trim().is_empty() {
            return Err(ConfigError::Missing("CLIENT_SECRET"));
        }

        Ok(Self { client_id, client_secret: ClientSecret(client_secret) })
    }

    /// The public client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }
}

/// GitHub endpoints used by the login flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Where the browser is sent to approve access.
    pub authorize: Url,
    /// Where codes are exchanged for tokens.
    pub token: Url,
    /// Base of the REST API.
    pub api: Url,
}

impl Endpoints {
    /// Parse a set of endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if any URL can’t be parsed.
    pub fn new(
        authorize: &str,
        token: &str,
        api: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            authorize: parse_url("authorize URL", authorize)?,
            token: parse_url("token URL", token)?,
            api: parse_url("API URL", api)?,
        })
    }

    /// Get the URL for a path under the API base.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` can’t be joined to the base URL.
    pub fn api_url(&self, path: &str) -> Result<Url, url::ParseError> {
        // `Url::join` drops the last segment unless the base ends with `/`.
        if self.api.path().ends_with('/') {
            self.api.join(path)
        } else {
            Url::parse(&format!("{}/", self.api))?.join(path)
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_URL, DEFAULT_API_URL)
            .expect("default endpoints are valid URLs")
    }
}

/// Parse a URL, naming it in the error.
fn parse_url(name: &'static str, input: &str) -> Result<Url, ConfigError> {
    Url::parse(input).map_err(|error| ConfigError::InvalidUrl { name, error })
}

/// Immutable configuration for the whole process.
#[derive(Clone, Debug)]
pub struct Config {
    /// OAuth application credentials.
    pub credentials: Credentials,
    /// GitHub endpoints.
    pub endpoints: Endpoints,
    /// Timeout for each request to GitHub.
    pub timeout: Duration,
    /// OAuth scope to request, if any.
    pub scope: Option<String>,
}

impl Config {
    /// Create a configuration using the public GitHub endpoints.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            scope: None,
        }
    }

    /// Use different endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Use a different request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request an OAuth scope. Blank scopes are ignored.
    #[must_use]
    pub fn with_scope<S: Into<String>>(mut self, scope: Option<S>) -> Self {
        self.scope = scope
            .map(Into::into)
            .filter(|scope: &String| !scope.trim().is_empty());
        self
    }

    /// The URL to send the browser to so the user can approve access.
    #[must_use]
    pub fn authorize_url(&self) -> Url {
        let mut url = self.endpoints.authorize.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", self.credentials.client_id());
            if let Some(scope) = &self.scope {
                query.append_pair("scope", scope);
            }
        }
        url
    }
}
