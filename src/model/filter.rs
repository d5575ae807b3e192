use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Item;

/// Which items a list view should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
  #[default]
  All,
  Active,
  Completed,
}

impl ItemFilter {
  pub fn matches(&self, item: &Item) -> bool {
    match self {
      ItemFilter::All => true,
      ItemFilter::Active => item.is_active(),
      ItemFilter::Completed => item.is_completed(),
    }
  }

  /// Keep the matching items, preserving their order.
  pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
    match self {
      ItemFilter::All => items,
      _ => items.into_iter().filter(|item| self.matches(item)).collect(),
    }
  }
}

impl FromStr for ItemFilter {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "all" => Ok(ItemFilter::All),
      "active" => Ok(ItemFilter::Active),
      "completed" | "done" => Ok(ItemFilter::Completed),
      other => Err(format!("unknown filter '{}'", other)),
    }
  }
}

impl fmt::Display for ItemFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ItemFilter::All => "all",
      ItemFilter::Active => "active",
      ItemFilter::Completed => "completed",
    };
    f.write_str(name)
  }
}

/// Active/completed counts over a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
  pub active: usize,
  pub completed: usize,
}

impl Statistics {
  pub fn from_items(items: &[Item]) -> Self {
    let completed = items.iter().filter(|item| item.is_completed()).count();
    Self {
      active: items.len() - completed,
      completed,
    }
  }

  pub fn total(&self) -> usize {
    self.active + self.completed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn items() -> Vec<Item> {
    vec![
      Item::with_id("1", Some("one".into()), None),
      Item::with_id("2", Some("two".into()), None).with_completed(true),
      Item::with_id("3", Some("three".into()), None),
    ]
  }

  fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(Item::id).collect()
  }

  #[test]
  fn test_filter_all_keeps_everything() {
    assert_eq!(ids(&ItemFilter::All.apply(items())), vec!["1", "2", "3"]);
  }

  #[test]
  fn test_filter_active_preserves_order() {
    assert_eq!(ids(&ItemFilter::Active.apply(items())), vec!["1", "3"]);
  }

  #[test]
  fn test_filter_completed() {
    assert_eq!(ids(&ItemFilter::Completed.apply(items())), vec!["2"]);
  }

  #[test]
  fn test_parse_filter() {
    assert_eq!("Active".parse::<ItemFilter>(), Ok(ItemFilter::Active));
    assert_eq!("done".parse::<ItemFilter>(), Ok(ItemFilter::Completed));
    assert!("bogus".parse::<ItemFilter>().is_err());
  }

  #[test]
  fn test_statistics() {
    let stats = Statistics::from_items(&items());
    assert_eq!(stats.active, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.total(), 3);
    assert_eq!(Statistics::from_items(&[]), Statistics::default());
  }
}
