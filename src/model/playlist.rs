use serde::{Deserialize, Serialize};

use super::Item;

/// An ordered run of items with a cursor on the current one.
///
/// Moving past either end wraps around to the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
  items: Vec<Item>,
  current: Option<usize>,
}

impl Playlist {
  /// Playlist positioned on the first item, or on nothing when `items` is empty.
  pub fn new(items: Vec<Item>) -> Self {
    let current = if items.is_empty() { None } else { Some(0) };
    Self { items, current }
  }

  pub fn items(&self) -> &[Item] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn current(&self) -> Option<&Item> {
    self.current.map(|pos| &self.items[pos])
  }

  /// Move the cursor to the item with `id`. Returns false and leaves the
  /// cursor alone when no such item is in the playlist.
  pub fn select(&mut self, id: &str) -> bool {
    match self.items.iter().position(|item| item.id() == id) {
      Some(pos) => {
        self.current = Some(pos);
        true
      }
      None => false,
    }
  }

  /// Advance to the following item, wrapping from the last to the first.
  pub fn next_item(&mut self) -> Option<&Item> {
    let pos = self.current?;
    self.current = Some((pos + 1) % self.items.len());
    self.current()
  }

  /// Step back to the preceding item, wrapping from the first to the last.
  pub fn previous_item(&mut self) -> Option<&Item> {
    let pos = self.current?;
    self.current = Some(pos.checked_sub(1).unwrap_or(self.items.len() - 1));
    self.current()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn playlist(ids: &[&str]) -> Playlist {
    Playlist::new(
      ids
        .iter()
        .map(|id| Item::with_id(*id, Some(id.to_string()), None))
        .collect(),
    )
  }

  fn current_id(playlist: &Playlist) -> Option<&str> {
    playlist.current().map(Item::id)
  }

  #[test]
  fn test_starts_on_first_item() {
    let playlist = playlist(&["a", "b", "c"]);
    assert_eq!(current_id(&playlist), Some("a"));
    assert_eq!(playlist.len(), 3);
  }

  #[test]
  fn test_next_wraps_to_first() {
    let mut playlist = playlist(&["a", "b", "c"]);
    assert_eq!(playlist.next_item().map(Item::id), Some("b"));
    assert_eq!(playlist.next_item().map(Item::id), Some("c"));
    assert_eq!(playlist.next_item().map(Item::id), Some("a"));
  }

  #[test]
  fn test_previous_wraps_to_last() {
    let mut playlist = playlist(&["a", "b", "c"]);
    assert_eq!(playlist.previous_item().map(Item::id), Some("c"));
    assert_eq!(playlist.previous_item().map(Item::id), Some("b"));
    assert_eq!(playlist.previous_item().map(Item::id), Some("a"));
  }

  #[test]
  fn test_single_item_stays_put() {
    let mut playlist = playlist(&["only"]);
    assert_eq!(playlist.next_item().map(Item::id), Some("only"));
    assert_eq!(playlist.previous_item().map(Item::id), Some("only"));
  }

  #[test]
  fn test_empty_playlist_has_no_current() {
    let mut playlist = Playlist::new(Vec::new());
    assert!(playlist.is_empty());
    assert!(playlist.current().is_none());
    assert!(playlist.next_item().is_none());
    assert!(playlist.previous_item().is_none());
  }

  #[test]
  fn test_select() {
    let mut playlist = playlist(&["a", "b", "c"]);
    assert!(playlist.select("c"));
    assert_eq!(playlist.next_item().map(Item::id), Some("a"));

    assert!(!playlist.select("zzz"));
    assert_eq!(current_id(&playlist), Some("a"));
  }
}
