//! Production implementation of the API.
//!
//! This module contains the concrete implementation of the API traits,
//! backed by the real GitHub OAuth and REST endpoints.

use super::definition::{ApiBase, LoginApi};
use crate::config::Config;
use crate::github::{self, AccessToken, GitHubClient, UserProfile};
use url::Url;

/// State data for the API (configuration and GitHub client).
///
/// Built once at startup; requests only read it.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Immutable process configuration.
    pub config: Config,
    /// Client for making requests to GitHub.
    pub github: GitHubClient,
}

impl AppState {
    /// Create state from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client can’t be created.
    pub fn new(config: Config) -> github::Result<Self> {
        let github = GitHubClient::new(&config)?;
        Ok(Self { config, github })
    }
}

impl ApiBase for AppState {
    async fn check_health(&self) -> String {
        "ok".to_owned()
    }

    async fn get_version(&self) -> String {
        env!("GIT_VERSION").to_owned()
    }

    fn authorize_url(&self) -> Url {
        self.config.authorize_url()
    }

    async fn exchange_code_for_token(
        &self,
        code: &str,
        log: &slog::Logger,
    ) -> github::Result<AccessToken> {
        self.github.exchange_code_for_token(code, log).await
    }

    async fn fetch_user_profile(
        &self,
        token: &AccessToken,
        log: &slog::Logger,
    ) -> github::Result<UserProfile> {
        self.github.fetch_user_profile(token, log).await
    }
}

/// Implementation type for the `LoginApi` trait.
///
/// This is an empty enum that serves as the implementation marker.
/// All the actual logic is in the default trait methods.
pub enum LoginApiImpl {}

impl LoginApi for LoginApiImpl {
    type Context = AppState;
}
