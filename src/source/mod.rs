//! Storage tiers behind a common data source contract.
//!
//! Two backends implement [`DataSource`]:
//! - [`LocalStore`]: durable SQLite mirror on this machine
//! - [`RemoteService`]: the authoritative catalog, reached with latency
//!
//! The repository only ever sees `Arc<dyn DataSource>`, so either tier can be
//! swapped for another implementation (a real HTTP client, a test fake).

mod local;
mod remote;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::model::Item;

pub use local::LocalStore;
pub use remote::{seed_catalog, RemoteService, DEFAULT_LATENCY};

/// Errors reported by a data source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
  /// The tier has nothing to offer: empty, unreachable, or the id is unknown.
  #[error("data not available")]
  NotAvailable,
  /// The tier failed while reading or writing.
  #[error("storage error: {0}")]
  Storage(String),
}

impl DataError {
  pub fn storage(err: impl fmt::Display) -> Self {
    DataError::Storage(err.to_string())
  }
}

pub type DataResult<T> = Result<T, DataError>;

/// Operations every storage tier supports.
///
/// Reads are asynchronous. Writes acknowledge submission only and return
/// without waiting for the tier to make them durable.
#[async_trait]
pub trait DataSource: Send + Sync {
  /// All items held by this tier. `NotAvailable` when the tier is empty or unreachable.
  async fn list(&self) -> DataResult<Vec<Item>>;

  /// A single item by id.
  async fn get(&self, id: &str) -> DataResult<Item>;

  /// Insert or replace an item.
  fn save(&self, item: &Item) -> DataResult<()>;

  /// Remove an item. Unknown ids are ignored.
  fn delete(&self, id: &str) -> DataResult<()>;

  fn delete_all(&self) -> DataResult<()>;

  fn mark_complete(&self, id: &str) -> DataResult<()>;

  fn mark_active(&self, id: &str) -> DataResult<()>;

  /// Remove every completed item.
  fn clear_completed(&self) -> DataResult<()>;
}

/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
  Cache,
  Local,
  Remote,
}

impl fmt::Display for Tier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Tier::Cache => "cache",
      Tier::Local => "local",
      Tier::Remote => "remote",
    };
    f.write_str(name)
  }
}
