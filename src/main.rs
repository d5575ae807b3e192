use catalog::app::App;
use catalog::commands::Command;
use catalog::config::Config;
use catalog::logging;
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Browse and edit a media catalog backed by a local store and a remote service")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./catalog.yaml, then $XDG_CONFIG_HOME/catalog/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Skip the remote refresh when the cache is stale
  #[arg(long)]
  offline: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration, then apply command line overrides
  let config = Config::load(args.config.as_deref())?.with_offline(args.offline);

  // Keep the guard alive so buffered log lines are flushed on exit
  let _guard = logging::init(&config)?;

  let mut app = App::new(&config)?;
  let output = app.run(args.command).await?;
  println!("{}", output);

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_offline_flag() {
    let args = Args::try_parse_from(["catalog", "--offline", "list"]).unwrap();
    assert!(args.offline);
    assert!(!Config::default().with_offline(args.offline).use_remote);

    let args = Args::try_parse_from(["catalog", "stats"]).unwrap();
    assert!(!args.offline);
    assert!(Config::default().with_offline(args.offline).use_remote);
  }

  #[test]
  fn test_config_flag() {
    let args = Args::try_parse_from(["catalog", "-c", "/tmp/catalog.yaml", "ls"]).unwrap();
    assert_eq!(args.config, Some(PathBuf::from("/tmp/catalog.yaml")));
    assert!(matches!(args.command, Command::List { .. }));
  }
}
