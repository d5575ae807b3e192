//! Recording data source for repository and use case tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{DataError, DataResult, DataSource};
use crate::model::{Item, ItemMap};

/// A call received by [`FakeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  List,
  Get(String),
  Save(String),
  Delete(String),
  DeleteAll,
  MarkComplete(String),
  MarkActive(String),
  ClearCompleted,
}

/// In-memory data source that answers immediately and records every call.
#[derive(Default)]
pub struct FakeSource {
  items: Mutex<ItemMap>,
  calls: Mutex<Vec<Call>>,
  unavailable: Mutex<bool>,
  failing_reads: Mutex<bool>,
  failing_writes: Mutex<bool>,
}

impl FakeSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
    let source = Self::new();
    *source.items.lock().unwrap() = items.into_iter().collect();
    source
  }

  /// Make every read report `NotAvailable`.
  pub fn set_unavailable(&self, unavailable: bool) {
    *self.unavailable.lock().unwrap() = unavailable;
  }

  /// Make every read report a storage error.
  pub fn set_failing_reads(&self, failing: bool) {
    *self.failing_reads.lock().unwrap() = failing;
  }

  /// Make every write report a storage error (after recording the call).
  pub fn set_failing_writes(&self, failing: bool) {
    *self.failing_writes.lock().unwrap() = failing;
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn clear_calls(&self) {
    self.calls.lock().unwrap().clear();
  }

  pub fn count(&self, wanted: &Call) -> usize {
    self.calls().iter().filter(|call| *call == wanted).count()
  }

  pub fn list_calls(&self) -> usize {
    self.count(&Call::List)
  }

  pub fn save_calls(&self) -> usize {
    self
      .calls()
      .iter()
      .filter(|call| matches!(call, Call::Save(_)))
      .count()
  }

  pub fn stored(&self) -> Vec<Item> {
    self.items.lock().unwrap().to_vec()
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }

  fn write(&self, call: Call, apply: impl FnOnce(&mut ItemMap)) -> DataResult<()> {
    self.record(call);
    if *self.failing_writes.lock().unwrap() {
      return Err(DataError::Storage("write rejected".to_string()));
    }
    apply(&mut *self.items.lock().unwrap());
    Ok(())
  }

  fn readable(&self) -> DataResult<()> {
    if *self.failing_reads.lock().unwrap() {
      return Err(DataError::Storage("read rejected".to_string()));
    }
    if *self.unavailable.lock().unwrap() {
      Err(DataError::NotAvailable)
    } else {
      Ok(())
    }
  }
}

#[async_trait]
impl DataSource for FakeSource {
  async fn list(&self) -> DataResult<Vec<Item>> {
    self.record(Call::List);
    self.readable()?;
    let items = self.stored();
    if items.is_empty() {
      return Err(DataError::NotAvailable);
    }
    Ok(items)
  }

  async fn get(&self, id: &str) -> DataResult<Item> {
    self.record(Call::Get(id.to_string()));
    self.readable()?;
    self
      .items
      .lock()
      .unwrap()
      .get(id)
      .cloned()
      .ok_or(DataError::NotAvailable)
  }

  fn save(&self, item: &Item) -> DataResult<()> {
    let item = item.clone();
    self.write(Call::Save(item.id().to_string()), |items| {
      items.insert(item);
    })
  }

  fn delete(&self, id: &str) -> DataResult<()> {
    self.write(Call::Delete(id.to_string()), |items| {
      items.remove(id);
    })
  }

  fn delete_all(&self) -> DataResult<()> {
    self.write(Call::DeleteAll, ItemMap::clear)
  }

  fn mark_complete(&self, id: &str) -> DataResult<()> {
    self.write(Call::MarkComplete(id.to_string()), |items| {
      if let Some(item) = items.get(id).cloned() {
        items.insert(item.with_completed(true));
      }
    })
  }

  fn mark_active(&self, id: &str) -> DataResult<()> {
    self.write(Call::MarkActive(id.to_string()), |items| {
      if let Some(item) = items.get(id).cloned() {
        items.insert(item.with_completed(false));
      }
    })
  }

  fn clear_completed(&self) -> DataResult<()> {
    self.write(Call::ClearCompleted, |items| items.retain(Item::is_active))
  }
}
