//! Simulated remote catalog service.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use super::{DataError, DataResult, DataSource};
use crate::model::{Item, ItemMap};

/// Default simulated round trip for reads.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(5000);

/// Authoritative catalog held in memory behind a fixed artificial latency.
///
/// Reads resolve after `latency` on the async runtime. Writes are applied
/// immediately and only acknowledge submission. A real deployment would put
/// an HTTP client behind the same [`DataSource`] contract.
pub struct RemoteService {
  items: Mutex<ItemMap>,
  latency: Duration,
}

impl RemoteService {
  /// Service seeded with the default catalog.
  pub fn new(latency: Duration) -> Self {
    Self::with_items(latency, seed_catalog())
  }

  /// Service holding exactly `items`.
  pub fn with_items(latency: Duration, items: impl IntoIterator<Item = Item>) -> Self {
    Self {
      items: Mutex::new(items.into_iter().collect()),
      latency,
    }
  }

  pub fn latency(&self) -> Duration {
    self.latency
  }

  fn items(&self) -> DataResult<MutexGuard<'_, ItemMap>> {
    self
      .items
      .lock()
      .map_err(|e| DataError::Storage(format!("Lock poisoned: {}", e)))
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

impl Default for RemoteService {
  fn default() -> Self {
    Self::new(DEFAULT_LATENCY)
  }
}

/// Catalog the service starts with.
pub fn seed_catalog() -> Vec<Item> {
  vec![
    Item::new(
      Some("One Punch Man Theme".to_string()),
      Some("1st song on OST.".to_string()),
    )
    .with_media_ref("https://www.youtube.com/watch?v=E8XaV1yjabk"),
    Item::new(
      Some("Transistor OST".to_string()),
      Some("Full soundtrack to the game Transistor.".to_string()),
    )
    .with_media_ref("https://www.youtube.com/watch?v=-zA1jRmAYfU"),
  ]
}

#[async_trait]
impl DataSource for RemoteService {
  async fn list(&self) -> DataResult<Vec<Item>> {
    self.simulate_latency().await;
    let items = self.items()?.to_vec();
    debug!("Remote service returned {} items", items.len());
    if items.is_empty() {
      return Err(DataError::NotAvailable);
    }
    Ok(items)
  }

  async fn get(&self, id: &str) -> DataResult<Item> {
    self.simulate_latency().await;
    self.items()?.get(id).cloned().ok_or(DataError::NotAvailable)
  }

  fn save(&self, item: &Item) -> DataResult<()> {
    self.items()?.insert(item.clone());
    Ok(())
  }

  fn delete(&self, id: &str) -> DataResult<()> {
    self.items()?.remove(id);
    Ok(())
  }

  fn delete_all(&self) -> DataResult<()> {
    self.items()?.clear();
    Ok(())
  }

  fn mark_complete(&self, id: &str) -> DataResult<()> {
    let mut items = self.items()?;
    if let Some(item) = items.get(id).cloned() {
      items.insert(item.with_completed(true));
    }
    Ok(())
  }

  fn mark_active(&self, id: &str) -> DataResult<()> {
    let mut items = self.items()?;
    if let Some(item) = items.get(id).cloned() {
      items.insert(item.with_completed(false));
    }
    Ok(())
  }

  fn clear_completed(&self) -> DataResult<()> {
    self.items()?.retain(Item::is_active);
    Ok(())
  }
}
