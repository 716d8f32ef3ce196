//! Logger setup.

use slog::Drain;

/// Create the root logger.
///
/// Logs go to stderr. `verbose` raises the level from info to debug (1) or
/// trace (2 or more).
pub fn init(verbose: u8, color: termcolor::ColorChoice) -> slog::Logger {
    let level = match verbose {
        0 => slog::Level::Info,
        1 => slog::Level::Debug,
        _ => slog::Level::Trace,
    };

    let builder = slog_term::TermDecorator::new().stderr();
    let decorator = match color {
        termcolor::ColorChoice::Always | termcolor::ColorChoice::AlwaysAnsi => {
            builder.force_color()
        }
        termcolor::ColorChoice::Never => builder.force_plain(),
        termcolor::ColorChoice::Auto => builder,
    }
    .build();

    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    slog::Logger::root(drain, slog::o!())
}
