//! In-memory cache owned by the repository.

use crate::model::{Item, ItemMap};

/// Whether the full-list view can be trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Freshness {
  #[default]
  Fresh,
  /// Must be refreshed from the authoritative tier before being served.
  Dirty,
}

/// Cached items plus their freshness.
///
/// `items` is `None` until the cache is first populated by a list or a
/// write, so an emptied cache is still a valid answer.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
  items: Option<ItemMap>,
  freshness: Freshness,
}

impl CacheState {
  pub fn freshness(&self) -> Freshness {
    self.freshness
  }

  pub fn invalidate(&mut self) {
    self.freshness = Freshness::Dirty;
  }

  /// Cached items, if the cache is populated and fresh.
  pub fn fresh_items(&self) -> Option<Vec<Item>> {
    match (&self.items, self.freshness) {
      (Some(items), Freshness::Fresh) => Some(items.to_vec()),
      _ => None,
    }
  }

  pub fn get(&self, id: &str) -> Option<Item> {
    self.items.as_ref()?.get(id).cloned()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.items.as_ref().is_some_and(|items| items.contains(id))
  }

  /// Replace the contents wholesale and mark the cache fresh.
  pub fn refresh(&mut self, items: Vec<Item>) -> Vec<Item> {
    let map: ItemMap = items.into_iter().collect();
    let snapshot = map.to_vec();
    self.items = Some(map);
    self.freshness = Freshness::Fresh;
    snapshot
  }

  pub fn insert(&mut self, item: Item) {
    self.items.get_or_insert_with(ItemMap::new).insert(item);
  }

  pub fn remove(&mut self, id: &str) {
    if let Some(items) = self.items.as_mut() {
      items.remove(id);
    }
  }

  pub fn clear(&mut self) {
    self.items.get_or_insert_with(ItemMap::new).clear();
  }

  /// Rebuild the cached item with a new status, keeping its position.
  pub fn set_completed(&mut self, id: &str, completed: bool) {
    if let Some(items) = self.items.as_mut() {
      if let Some(item) = items.get(id).cloned() {
        items.insert(item.with_completed(completed));
      }
    }
  }

  pub fn retain_active(&mut self) {
    if let Some(items) = self.items.as_mut() {
      items.retain(Item::is_active);
    }
  }
}
