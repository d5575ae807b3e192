use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Reference to externally resolvable content (a URL, an asset name).
///
/// Stored and transported as a plain string; this layer never loads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
  pub fn new(reference: impl Into<String>) -> Self {
    Self(reference.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for MediaRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for MediaRef {
  fn from(s: &str) -> Self {
    Self::new(s)
  }
}

impl From<String> for MediaRef {
  fn from(s: String) -> Self {
    Self(s)
  }
}

/// One catalog entry.
///
/// Items are immutable values: changing the status produces a new `Item`
/// carrying the same id. Equality and hashing only look at
/// `(id, title, description)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  id: String,
  title: Option<String>,
  description: Option<String>,
  #[serde(default)]
  completed: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  media_ref: Option<MediaRef>,
}

impl Item {
  /// Create a new active item with a freshly generated id.
  pub fn new(title: Option<String>, description: Option<String>) -> Self {
    Self::with_id(Uuid::new_v4().to_string(), title, description)
  }

  /// Create an active item that already has an id (a copy of another item).
  pub fn with_id(
    id: impl Into<String>,
    title: Option<String>,
    description: Option<String>,
  ) -> Self {
    Self {
      id: id.into(),
      title,
      description,
      completed: false,
      media_ref: None,
    }
  }

  /// Same item with the given status.
  pub fn with_completed(self, completed: bool) -> Self {
    Self { completed, ..self }
  }

  /// Same item pointing at the given media.
  pub fn with_media_ref(self, media_ref: impl Into<MediaRef>) -> Self {
    Self {
      media_ref: Some(media_ref.into()),
      ..self
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn title(&self) -> Option<&str> {
    self.title.as_deref()
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn media_ref(&self) -> Option<&MediaRef> {
    self.media_ref.as_ref()
  }

  pub fn is_completed(&self) -> bool {
    self.completed
  }

  pub fn is_active(&self) -> bool {
    !self.completed
  }

  /// Text to show in a list row: the title, or the description when the
  /// title is missing or blank.
  pub fn title_for_list(&self) -> Option<&str> {
    match self.title() {
      Some(title) if !title.is_empty() => Some(title),
      _ => self.description(),
    }
  }

  /// True when neither a title nor a description is set.
  pub fn is_empty(&self) -> bool {
    self.title().map_or(true, str::is_empty) && self.description().map_or(true, str::is_empty)
  }
}

impl PartialEq for Item {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id && self.title == other.title && self.description == other.description
  }
}

impl Eq for Item {}

impl Hash for Item {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
    self.title.hash(state);
    self.description.hash(state);
  }
}

impl fmt::Display for Item {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.title_for_list().unwrap_or("(untitled)"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn text(s: &str) -> Option<String> {
    Some(s.to_string())
  }

  #[test]
  fn test_new_generates_distinct_ids() {
    let a = Item::new(text("A"), None);
    let b = Item::new(text("A"), None);
    assert_ne!(a.id(), b.id());
    assert!(!a.id().is_empty());
  }

  #[test]
  fn test_equality_ignores_status_and_media() {
    let item = Item::with_id("1", text("Title"), text("Desc"));
    let completed = item.clone().with_completed(true).with_media_ref("song.mp3");
    assert_eq!(item, completed);
    assert!(completed.is_completed());
    assert_eq!(completed.media_ref().map(MediaRef::as_str), Some("song.mp3"));
  }

  #[test]
  fn test_equality_compares_title() {
    let a = Item::with_id("1", text("Title"), None);
    let b = Item::with_id("1", text("Other"), None);
    assert_ne!(a, b);
  }

  #[test]
  fn test_title_for_list_falls_back_to_description() {
    let item = Item::with_id("1", text(""), text("Desc"));
    assert_eq!(item.title_for_list(), Some("Desc"));

    let item = Item::with_id("1", text("Title"), text("Desc"));
    assert_eq!(item.title_for_list(), Some("Title"));
  }

  #[test]
  fn test_is_empty() {
    assert!(Item::new(None, None).is_empty());
    assert!(Item::new(text(""), text("")).is_empty());
    assert!(!Item::new(None, text("Desc")).is_empty());
  }

  #[test]
  fn test_media_ref_from_owned_string() {
    let item = Item::new(text("Song"), None).with_media_ref(String::from("song.mp3"));
    assert_eq!(item.media_ref(), Some(&MediaRef::new("song.mp3")));
  }

  #[test]
  fn test_missing_status_deserializes_as_active() {
    let item: Item =
      serde_json::from_str(r#"{"id":"x","title":"T","description":null}"#).unwrap();
    assert!(item.is_active());
    assert!(item.media_ref().is_none());
  }
}
