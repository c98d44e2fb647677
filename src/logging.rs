//! Logging setup for the command line tool.
//!
//! Installs a global `tracing` subscriber writing to stderr. `RUST_LOG`
//! overrides the level passed in by the caller.

use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

static INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install global tracing subscriber")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError)
}

/// Initialize logging at `level`. Subsequent calls are no-ops.
pub fn init(level: Level) -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = build_env_filter(level)?;
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INITIALIZED.set(());
    Ok(())
}

fn build_env_filter(level: Level) -> Result<EnvFilter, LoggingError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) if !spec.trim().is_empty() => Ok(EnvFilter::try_new(spec)?),
        _ => Ok(EnvFilter::default().add_directive(level.into()))
    }
}

/// Maps the number of `-v` flags to a level, starting from `info`.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::{init, level_for};

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), Level::INFO);
        assert_eq!(level_for(1), Level::DEBUG);
        assert_eq!(level_for(5), Level::TRACE);
    }

    #[test]
    fn test_init_twice_is_ok() {
        assert!(init(Level::WARN).is_ok());
        assert!(init(Level::WARN).is_ok());
    }
}
