//! octologin-backend executable.

use anyhow::anyhow;
use octologin_backend::api;
use std::process::ExitCode;

mod logging;
mod params;
mod server;

use params::{Command, Params, Parser};

/// Wrapper to handle errors.
///
/// See [`cli()`].
fn main() -> ExitCode {
    // Development secrets may live in `.env`; real environment wins.
    let dotenv_path = dotenv::dotenv().ok();

    let params = Params::parse();
    cli(&params, dotenv_path.as_deref()).unwrap_or_else(|error| {
        let error = format!("{error}\n");
        if error.to_lowercase().starts_with("error") {
            params.warn(error).unwrap();
        } else {
            params.warn(format!("Error: {error}")).unwrap();
        }

        ExitCode::FAILURE
    })
}

/// Do the actual work.
///
/// Returns the exit code to use.
///
/// # Errors
///
/// This returns any errors encountered during the run so that they can be
/// outputted nicely in [`main()`].
fn cli(
    params: &Params,
    dotenv_path: Option<&std::path::Path>,
) -> anyhow::Result<ExitCode> {
    let log =
        logging::init(params.verbose, params.color_choice(&std::io::stderr()));
    if let Some(path) = dotenv_path {
        slog::debug!(log, "Loaded environment from {}", path.display());
    }

    match &params.command {
        Command::Serve(serve_params) => {
            server::serve(&serve_params.bind, serve_params.config()?, &log)?;
        }
        Command::Openapi(openapi_params) => {
            generate_openapi(openapi_params)?;
        }
        Command::Version => {
            println!("{}", env!("GIT_VERSION"));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Generate `OpenAPI` specification.
///
/// Uses the trait-based API stub to generate the spec without requiring
/// an implementation.
///
/// # Errors
///
/// Returns an error if the `OpenAPI` spec cannot be generated or written.
fn generate_openapi(params: &params::OpenapiParams) -> anyhow::Result<()> {
    let api = api::login_api_mod::stub_api_description().map_err(|error| {
        anyhow!("Failed to create API description: {error}")
    })?;

    // Use version from Cargo.toml via CARGO_PKG_VERSION environment variable
    let version = semver::Version::parse(env!("CARGO_PKG_VERSION"))?;

    let spec = api.openapi("Octologin", version);

    let json_value = spec.json()?;
    let json_string = serde_json::to_string_pretty(&json_value)?;

    if let Some(output_path) = &params.output {
        std::fs::write(output_path, format!("{json_string}\n"))?;
    } else {
        println!("{json_string}");
    }

    Ok(())
}
