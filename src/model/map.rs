use std::collections::HashMap;

use super::Item;

/// Insertion-ordered map of items keyed by id.
///
/// Replacing an existing id keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct ItemMap {
  items: Vec<Item>,
  index: HashMap<String, usize>,
}

impl ItemMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn get(&self, id: &str) -> Option<&Item> {
    self.index.get(id).map(|&pos| &self.items[pos])
  }

  pub fn contains(&self, id: &str) -> bool {
    self.index.contains_key(id)
  }

  /// Insert or replace, returning the previous item for this id.
  pub fn insert(&mut self, item: Item) -> Option<Item> {
    match self.index.get(item.id()) {
      Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
      None => {
        self.index.insert(item.id().to_string(), self.items.len());
        self.items.push(item);
        None
      }
    }
  }

  pub fn remove(&mut self, id: &str) -> Option<Item> {
    let pos = self.index.remove(id)?;
    let removed = self.items.remove(pos);
    for slot in self.index.values_mut() {
      if *slot > pos {
        *slot -= 1;
      }
    }
    Some(removed)
  }

  /// Keep only the items matching `keep`, preserving order.
  pub fn retain(&mut self, mut keep: impl FnMut(&Item) -> bool) {
    self.items.retain(|item| keep(item));
    self.reindex();
  }

  pub fn clear(&mut self) {
    self.items.clear();
    self.index.clear();
  }

  pub fn values(&self) -> impl Iterator<Item = &Item> {
    self.items.iter()
  }

  pub fn to_vec(&self) -> Vec<Item> {
    self.items.clone()
  }

  fn reindex(&mut self) {
    self.index = self
      .items
      .iter()
      .enumerate()
      .map(|(pos, item)| (item.id().to_string(), pos))
      .collect();
  }
}

impl FromIterator<Item> for ItemMap {
  fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
    let mut map = ItemMap::new();
    for item in iter {
      map.insert(item);
    }
    map
  }
}
