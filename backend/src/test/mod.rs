//! Test helpers for unit tests

use crate::api::{LoginApi, login_api_mod};
use crate::config::{Config, Credentials, Endpoints};
use dropshot::{ConfigDropshot, HttpServer, HttpServerStarter};

mod login_flow;

/// Client ID used with mock GitHub servers.
pub const CLIENT_ID: &str = "test-client-id";

/// Client secret used with mock GitHub servers.
pub const CLIENT_SECRET: &str = "test-client-secret";

/// A logger that throws everything away.
#[must_use]
pub fn discard_log() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// Configuration that points at a mock GitHub.
///
/// # Panics
///
/// Panics if the mock server’s URLs are invalid.
#[must_use]
pub fn mock_config(server: &httpmock::MockServer) -> Config {
    Config::new(Credentials::new(CLIENT_ID, CLIENT_SECRET).unwrap())
        .with_endpoints(
            Endpoints::new(
                &server.url("/login/oauth/authorize"),
                &server.url("/login/oauth/access_token"),
                &server.base_url(),
            )
            .unwrap(),
        )
}

/// A running server on an ephemeral port.
pub struct TestServer<C: dropshot::ServerContext> {
    /// The running server.
    server: HttpServer<C>,
    /// Client for making requests to the server.
    client: reqwest::Client,
}

impl<C: dropshot::ServerContext> TestServer<C> {
    /// Start a server for API implementation `T`.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if the server can’t be started.
    pub fn start<T>(context: C) -> Self
    where
        T: LoginApi<Context = C>,
    {
        let config_dropshot = ConfigDropshot {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            default_request_body_max_bytes: 1024,
            default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
            log_headers: vec![],
        };

        let api = login_api_mod::api_description::<T>().unwrap_or_else(
            |error| panic!("Failed to create API description: {error}"),
        );

        let server = HttpServerStarter::new(
            &config_dropshot,
            api,
            context,
            &discard_log(),
        )
        .unwrap_or_else(|error| panic!("Failed to create server: {error}"))
        .start();

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { server, client }
    }

    /// Get the full URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.server.local_addr())
    }

    /// Make a GET request and return the status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    /// Stop the server.
    ///
    /// # Panics
    ///
    /// Panics if the server did not shut down cleanly.
    pub async fn close(self) {
        self.server.close().await.unwrap();
    }
}
