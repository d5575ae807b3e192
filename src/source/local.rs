//! SQLite-backed local store.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{DataError, DataResult, DataSource};
use crate::model::{Item, MediaRef};

/// Schema for the local item table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT,
    description TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    media_ref TEXT
);
"#;

const SELECT_ITEMS: &str = "SELECT id, title, description, completed, media_ref FROM items";

/// Durable local copy of the catalog.
///
/// The store is a disposable mirror: the repository may wipe and refill it
/// from the remote service at any time.
pub struct LocalStore {
  conn: Mutex<Connection>,
}

impl LocalStore {
  /// Open or create the store at the default location.
  pub fn open_default() -> DataResult<Self> {
    Self::open(&Self::default_path()?)
  }

  /// Open or create the store at `path`.
  pub fn open(path: &Path) -> DataResult<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).map_err(|e| {
        DataError::Storage(format!("Failed to create store directory: {}", e))
      })?;
    }

    let conn = Connection::open(path).map_err(|e| {
      DataError::Storage(format!(
        "Failed to open local store at {}: {}",
        path.display(),
        e
      ))
    })?;

    debug!("Opened local store at {}", path.display());
    Self::from_connection(conn)
  }

  /// Open a store that lives only as long as this value.
  pub fn open_in_memory() -> DataResult<Self> {
    let conn = Connection::open_in_memory().map_err(DataError::storage)?;
    Self::from_connection(conn)
  }

  /// Get the default database path.
  pub fn default_path() -> DataResult<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| DataError::Storage("Could not determine data directory".to_string()))?;

    Ok(data_dir.join("catalog").join("catalog.db"))
  }

  fn from_connection(conn: Connection) -> DataResult<Self> {
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| DataError::Storage(format!("Failed to run migrations: {}", e)))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn conn(&self) -> DataResult<MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| DataError::Storage(format!("Lock poisoned: {}", e)))
  }

  fn set_completed(&self, id: &str, completed: bool) -> DataResult<()> {
    self
      .conn()?
      .execute(
        "UPDATE items SET completed = ? WHERE id = ?",
        params![completed, id],
      )
      .map_err(|e| DataError::Storage(format!("Failed to update item {}: {}", id, e)))?;
    Ok(())
  }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
  let id: String = row.get(0)?;
  let title: Option<String> = row.get(1)?;
  let description: Option<String> = row.get(2)?;
  let completed: bool = row.get(3)?;
  let media_ref: Option<String> = row.get(4)?;

  let item = Item::with_id(id, title, description).with_completed(completed);
  Ok(match media_ref {
    Some(reference) => item.with_media_ref(MediaRef::new(reference)),
    None => item,
  })
}

#[async_trait]
impl DataSource for LocalStore {
  async fn list(&self) -> DataResult<Vec<Item>> {
    let conn = self.conn()?;
    let mut stmt = conn
      .prepare(SELECT_ITEMS)
      .map_err(|e| DataError::Storage(format!("Failed to prepare query: {}", e)))?;

    let items: Vec<Item> = stmt
      .query_map([], item_from_row)
      .map_err(|e| DataError::Storage(format!("Failed to query items: {}", e)))?
      .collect::<rusqlite::Result<_>>()
      .map_err(|e| DataError::Storage(format!("Failed to read item: {}", e)))?;

    // A new or emptied table counts as no data from this tier.
    if items.is_empty() {
      return Err(DataError::NotAvailable);
    }
    Ok(items)
  }

  async fn get(&self, id: &str) -> DataResult<Item> {
    let conn = self.conn()?;
    let query = format!("{} WHERE id = ?", SELECT_ITEMS);

    conn
      .query_row(&query, params![id], item_from_row)
      .optional()
      .map_err(|e| DataError::Storage(format!("Failed to get item {}: {}", id, e)))?
      .ok_or(DataError::NotAvailable)
  }

  fn save(&self, item: &Item) -> DataResult<()> {
    self
      .conn()?
      .execute(
        "INSERT INTO items (id, title, description, completed, media_ref)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
           title = excluded.title,
           description = excluded.description,
           completed = excluded.completed,
           media_ref = excluded.media_ref",
        params![
          item.id(),
          item.title(),
          item.description(),
          item.is_completed(),
          item.media_ref().map(MediaRef::as_str),
        ],
      )
      .map_err(|e| DataError::Storage(format!("Failed to store item {}: {}", item.id(), e)))?;
    Ok(())
  }

  fn delete(&self, id: &str) -> DataResult<()> {
    self
      .conn()?
      .execute("DELETE FROM items WHERE id = ?", params![id])
      .map_err(|e| DataError::Storage(format!("Failed to delete item {}: {}", id, e)))?;
    Ok(())
  }

  fn delete_all(&self) -> DataResult<()> {
    self
      .conn()?
      .execute("DELETE FROM items", [])
      .map_err(|e| DataError::Storage(format!("Failed to delete items: {}", e)))?;
    Ok(())
  }

  fn mark_complete(&self, id: &str) -> DataResult<()> {
    self.set_completed(id, true)
  }

  fn mark_active(&self, id: &str) -> DataResult<()> {
    self.set_completed(id, false)
  }

  fn clear_completed(&self) -> DataResult<()> {
    self
      .conn()?
      .execute("DELETE FROM items WHERE completed = 1", [])
      .map_err(|e| DataError::Storage(format!("Failed to clear completed items: {}", e)))?;
    Ok(())
  }
}
