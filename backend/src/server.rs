//! Server startup and configuration.

use anyhow::anyhow;
use dropshot::{ConfigDropshot, HttpServerStarter};
use octologin_backend::api::{AppState, LoginApiImpl, login_api_mod};
use octologin_backend::config::Config;

/// Start the web server.
///
/// # Errors
///
/// Returns an error if:
/// - The bind address cannot be parsed
/// - The GitHub client cannot be created
/// - The API description cannot be created
/// - The server cannot be created
/// - The server encounters an error during operation
#[tokio::main]
pub async fn serve(
    address: &str,
    config: Config,
    log: &slog::Logger,
) -> anyhow::Result<()> {
    let config_dropshot = ConfigDropshot {
        bind_address: address
            .parse()
            .map_err(|error| anyhow!("Invalid bind address: {error}"))?,
        default_request_body_max_bytes: 1024,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        log_headers: vec![],
    };

    let api = login_api_mod::api_description::<LoginApiImpl>().map_err(
        |error| anyhow!("Failed to create API description: {error}"),
    )?;

    slog::info!(
        log,
        "Using GitHub client ID {}",
        config.credentials.client_id()
    );
    slog::debug!(log, "Request timeout: {:?}", config.timeout);
    let state = AppState::new(config)?;

    let server = HttpServerStarter::new(&config_dropshot, api, state, log)
        .map_err(|error| anyhow!("Failed to create server: {error}"))?
        .start();

    let version = env!("GIT_VERSION");
    slog::info!(log, "Server {version} running on http://{address}");

    server
        .await
        .map_err(|error| anyhow!("Server error: {error}"))
}
