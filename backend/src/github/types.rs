//! Values passed between the steps of a login.

use serde_json::{Map, Value};
use std::fmt;

/// A bearer credential for the GitHub API, issued for one user.
///
/// Lives only as long as the request that obtained it. `Debug` does not
/// reveal it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token string.
    #[must_use]
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    /// Get the token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// The authenticated user’s profile, as returned by `GET /user`.
///
/// All fields GitHub sends are kept, in the order GitHub sent them. The only
/// thing checked is that this is an object with a `login`.
#[derive(Clone, Debug, PartialEq)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// Validate a JSON value as a profile.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if `value` is not an object or
    /// does not have a string `login` field.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(format!("expected a JSON object, got {other}"));
            }
        };

        match map.get("login") {
            Some(Value::String(login)) if login.is_empty() => {
                Err("`login` is empty".to_owned())
            }
            Some(Value::String(_)) => Ok(Self(map)),
            Some(_) => Err("`login` is not a string".to_owned()),
            None => Err("no `login` in profile".to_owned()),
        }
    }

    /// The user’s login (username).
    #[must_use]
    pub fn login(&self) -> &str {
        self.get_str("login").unwrap_or_default()
    }

    /// The user’s display name, if they set one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get_str("name").filter(|name| !name.is_empty())
    }

    /// URL of the user’s avatar image.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.get_str("avatar_url")
    }

    /// URL of the user’s profile page on GitHub.
    #[must_use]
    pub fn html_url(&self) -> Option<&str> {
        self.get_str("html_url")
    }

    /// Get any field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a field if it is a string.
    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Iterate over all fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}
