//! Subcommands of the `catalog` binary, one per use case.

use clap::Subcommand;

use crate::model::ItemFilter;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
  /// List catalog items
  #[command(visible_alias = "ls")]
  List {
    /// Refetch from the remote service instead of trusting the cache
    #[arg(short, long)]
    refresh: bool,

    /// Which items to show: all, active, completed
    #[arg(short, long, default_value_t = ItemFilter::All)]
    filter: ItemFilter,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
  },

  /// Show a single item
  Get {
    id: String,

    #[arg(long)]
    json: bool,
  },

  /// Add a new item
  #[command(visible_alias = "new")]
  Add {
    title: String,

    #[arg(short, long)]
    description: Option<String>,

    /// Reference to the item's media (URL or asset name)
    #[arg(short, long)]
    media: Option<String>,
  },

  /// Mark an item completed
  #[command(visible_alias = "done")]
  Complete { id: String },

  /// Mark an item active again
  Activate { id: String },

  /// Delete an item from every tier
  #[command(visible_alias = "rm")]
  Delete { id: String },

  /// Delete every completed item
  ClearCompleted,

  /// Show the item after <id> in catalog order, wrapping to the first
  Next { id: String },

  /// Show the item before <id> in catalog order, wrapping to the last
  #[command(visible_alias = "prev")]
  Previous { id: String },

  /// Count active and completed items
  Stats {
    #[arg(long)]
    json: bool,
  },
}
