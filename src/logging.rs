//! Tracing subscriber setup.

use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Install the global subscriber.
///
/// Logs go to stderr, or to a daily-rolling file when `log.directory` is
/// configured. The returned guard flushes the file writer and must be kept
/// alive until exit.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
  let filter = filter(&config.log_filter())?;

  match &config.log.directory {
    Some(directory) => {
      std::fs::create_dir_all(directory).map_err(|e| {
        eyre!(
          "Failed to create log directory {}: {}",
          directory.display(),
          e
        )
      })?;

      let appender = tracing_appender::rolling::daily(directory, "catalog.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);

      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

      Ok(None)
    }
  }
}

/// Parse `tracing_subscriber::EnvFilter` directives.
pub fn filter(directives: &str) -> Result<EnvFilter> {
  EnvFilter::try_new(directives).map_err(|e| eyre!("Invalid log filter '{}': {}", directives, e))
}
