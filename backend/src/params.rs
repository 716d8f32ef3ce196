//! Code to deal with executable parameters.

use octologin_backend::config::{
    Config, ConfigError, Credentials, DEFAULT_API_URL, DEFAULT_AUTHORIZE_URL,
    DEFAULT_TOKEN_URL, Endpoints,
};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

pub use clap::Parser;

/// Log in with GitHub and show the user’s profile
#[derive(Debug, clap::Parser)]
#[clap(version = env!("GIT_VERSION"), about)]
pub struct Params {
    /// Whether or not to output in color
    #[clap(long, default_value = "auto", value_name = "WHEN", global = true)]
    pub color: ColorChoice,

    /// Verbosity (may be repeated up to two times)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Start the web server
    Serve(ServeParams),
    /// Generate `OpenAPI` specification
    Openapi(OpenapiParams),
    /// Output version
    Version,
}

/// Parameters for the `serve` subcommand
#[derive(Debug, clap::Args)]
pub struct ServeParams {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// GitHub OAuth application client ID
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: String,

    /// GitHub OAuth application client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// OAuth scope to request (default: public information only)
    #[arg(long)]
    pub scope: Option<String>,

    /// Timeout for requests to GitHub
    #[arg(long, default_value_t = 10, value_name = "SECONDS")]
    pub timeout: u64,

    /// GitHub OAuth authorization endpoint
    #[arg(long, hide = true, default_value = DEFAULT_AUTHORIZE_URL)]
    pub authorize_url: String,

    /// GitHub OAuth token endpoint
    #[arg(long, hide = true, default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,

    /// GitHub REST API base URL
    #[arg(long, hide = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

impl ServeParams {
    /// Build the process configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are blank or an endpoint URL is
    /// invalid.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let credentials = Credentials::new(
            self.client_id.as_str(),
            self.client_secret.as_str(),
        )?;
        let endpoints = Endpoints::new(
            &self.authorize_url,
            &self.token_url,
            &self.api_url,
        )?;

        Ok(Config::new(credentials)
            .with_endpoints(endpoints)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_scope(self.scope.as_deref()))
    }
}

/// Parameters for the `openapi` subcommand
#[derive(Debug, clap::Args)]
pub struct OpenapiParams {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl Params {
    /// Print a warning message in error color to `err_stream()`.
    pub fn warn<S: AsRef<str>>(&self, message: S) -> io::Result<()> {
        let mut err_out = self.err_stream();
        err_out.set_color(&error_color())?;
        err_out.write_all(message.as_ref().as_bytes())?;
        err_out.reset()?;

        Ok(())
    }

    /// Get stream to use for errors.
    pub fn err_stream(&self) -> StandardStream {
        StandardStream::stderr(self.color_choice(&io::stderr()))
    }

    /// Whether or not to output on a stream in color.
    ///
    /// Checks if passed stream is a terminal.
    pub fn color_choice<T: IsTerminal>(
        &self,
        stream: &T,
    ) -> termcolor::ColorChoice {
        if self.color == ColorChoice::Auto && !stream.is_terminal() {
            termcolor::ColorChoice::Never
        } else {
            self.color.into()
        }
    }
}

/// Whether or not to output in color
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Output in color when running in a terminal that supports it
    #[default]
    Auto,

    /// Always output in color
    Always,

    /// Never output in color
    Never,
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

/// Returns color used to output errors.
pub fn error_color() -> ColorSpec {
    let mut color = ColorSpec::new();
    color.set_fg(Some(Color::Red));
    color.set_intense(true);
    color
}
