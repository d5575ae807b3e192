//! Cache and consistency coordinator over the storage tiers.
//!
//! All reads and writes of items go through [`Repository`]. It owns the
//! in-memory cache and decides, per call, whether to answer from the cache,
//! the local store, or the remote service.

mod cache;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::model::Item;
use crate::source::{DataError, DataResult, DataSource, Tier};

use cache::CacheState;

pub use cache::Freshness;

/// Cache/consistency coordinator composing a local store and a remote service.
///
/// Cache state sits behind a mutex that is never held across an `.await`,
/// so a repository can be shared between tasks through an `Arc`.
pub struct Repository {
  local: Arc<dyn DataSource>,
  remote: Arc<dyn DataSource>,
  /// When false the remote tier is not used to refresh a dirty cache and
  /// writes to it are best-effort.
  use_remote: bool,
  state: Mutex<CacheState>,
}

impl Repository {
  /// Create a repository over the given tiers with an empty cache.
  pub fn new(local: Arc<dyn DataSource>, remote: Arc<dyn DataSource>) -> Self {
    Self {
      local,
      remote,
      use_remote: true,
      state: Mutex::new(CacheState::default()),
    }
  }

  /// Enable or disable the remote tier for refreshes.
  pub fn with_use_remote(mut self, use_remote: bool) -> Self {
    self.use_remote = use_remote;
    self
  }

  pub fn use_remote(&self) -> bool {
    self.use_remote
  }

  pub fn freshness(&self) -> Freshness {
    self.state().freshness()
  }

  /// Whether `id` is currently held by the in-memory cache.
  pub fn is_cached(&self, id: &str) -> bool {
    self.state().contains(id)
  }

  fn state(&self) -> MutexGuard<'_, CacheState> {
    // Cache updates cannot panic midway, so a poisoned lock still holds a consistent map.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// All items, from whichever tier can answer first.
  ///
  /// 1. Populated and fresh cache: returned as is, no I/O
  /// 2. Dirty cache with the remote enabled: refetch from the remote service
  /// 3. Otherwise the local store, falling back to the remote service
  ///
  /// A remote fetch replaces the local store's contents with the fetched set.
  pub async fn list(&self) -> DataResult<Vec<Item>> {
    let freshness = {
      let state = self.state();
      if let Some(items) = state.fresh_items() {
        debug!(tier = %Tier::Cache, count = items.len(), "Listing items");
        return Ok(items);
      }
      state.freshness()
    };

    if freshness == Freshness::Dirty && self.use_remote {
      return self.list_from_remote().await;
    }

    match self.local.list().await {
      Ok(items) => {
        let items = self.state().refresh(items);
        debug!(tier = %Tier::Local, count = items.len(), "Listing items");
        Ok(items)
      }
      Err(DataError::NotAvailable) => {
        debug!("Local store has no items, querying remote");
        self.list_from_remote().await
      }
      Err(e) => {
        warn!("Local store failed to list items, querying remote: {}", e);
        self.list_from_remote().await
      }
    }
  }

  /// A single item by id.
  ///
  /// Only the cache is consulted without I/O. Items found in the local store
  /// or remote service are returned without being added to the cache.
  pub async fn get(&self, id: &str) -> DataResult<Item> {
    let cached = self.state().get(id);
    if let Some(item) = cached {
      debug!(tier = %Tier::Cache, id, "Item found");
      return Ok(item);
    }

    match self.local.get(id).await {
      Ok(item) => {
        debug!(tier = %Tier::Local, id, "Item found");
        return Ok(item);
      }
      Err(DataError::NotAvailable) => debug!(id, "Item not in local store"),
      Err(e) => warn!(id, "Local store failed to get item: {}", e),
    }

    match self.remote.get(id).await {
      Ok(item) => {
        debug!(tier = %Tier::Remote, id, "Item found");
        Ok(item)
      }
      Err(DataError::NotAvailable) => {
        debug!(id, "Item not available from any tier");
        Err(DataError::NotAvailable)
      }
      Err(e) => {
        warn!(id, "Remote service failed to get item: {}", e);
        Err(DataError::NotAvailable)
      }
    }
  }

  /// Upsert an item in both tiers and the cache.
  ///
  /// The cache is updated even when a tier rejects the write; the first tier
  /// error is returned.
  pub fn save(&self, item: Item) -> DataResult<()> {
    let result = self.write_through("save", |tier| tier.save(&item));
    self.state().insert(item);
    result
  }

  pub fn delete(&self, id: &str) -> DataResult<()> {
    let result = self.write_through("delete", |tier| tier.delete(id));
    self.state().remove(id);
    result
  }

  pub fn delete_all(&self) -> DataResult<()> {
    let result = self.write_through("delete_all", |tier| tier.delete_all());
    self.state().clear();
    result
  }

  pub fn mark_complete(&self, id: &str) -> DataResult<()> {
    let result = self.write_through("mark_complete", |tier| tier.mark_complete(id));
    self.state().set_completed(id, true);
    result
  }

  pub fn mark_active(&self, id: &str) -> DataResult<()> {
    let result = self.write_through("mark_active", |tier| tier.mark_active(id));
    self.state().set_completed(id, false);
    result
  }

  /// Remove completed items from every tier.
  pub fn clear_completed(&self) -> DataResult<()> {
    let result = self.write_through("clear_completed", |tier| tier.clear_completed());
    self.state().retain_active();
    result
  }

  /// Mark the cache dirty so the next [`list`](Self::list) refetches.
  pub fn invalidate(&self) {
    self.state().invalidate();
  }

  async fn list_from_remote(&self) -> DataResult<Vec<Item>> {
    let fetched = match self.remote.list().await {
      Ok(items) => items,
      Err(e) => {
        warn!("Remote service could not list items: {}", e);
        return Err(DataError::NotAvailable);
      }
    };

    let items = self.state().refresh(fetched);
    self.replace_local(&items);
    info!(tier = %Tier::Remote, count = items.len(), "Refreshed items");
    Ok(items)
  }

  /// Make the local store an exact copy of `items`.
  fn replace_local(&self, items: &[Item]) {
    if let Err(e) = self.local.delete_all() {
      warn!("Failed to clear local store: {}", e);
    }
    for item in items {
      if let Err(e) = self.local.save(item) {
        warn!(id = item.id(), "Failed to mirror item to local store: {}", e);
      }
    }
  }

  /// Apply a write to the remote service, then the local store.
  fn write_through<F>(&self, op: &str, write: F) -> DataResult<()>
  where
    F: Fn(&dyn DataSource) -> DataResult<()>,
  {
    let remote = match write(self.remote.as_ref()) {
      Err(e) if !self.use_remote => {
        warn!(op, "Ignoring remote write failure: {}", e);
        Ok(())
      }
      Err(e) => {
        warn!(op, "Remote write failed: {}", e);
        Err(e)
      }
      Ok(()) => Ok(()),
    };

    let local = write(self.local.as_ref());
    if let Err(e) = &local {
      warn!(op, "Local write failed: {}", e);
    }

    remote.and(local)
  }
}
