use async_trait::async_trait;
use std::sync::Arc;

use crate::model::{Item, ItemFilter};
use crate::pipeline::{UseCase, UseCaseError, UseCaseResult};
use crate::repository::Repository;

/// Request for [`GetItems`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetItemsRequest {
  /// Invalidate the cache first so the list is refetched.
  pub force_update: bool,
  pub filter: ItemFilter,
}

/// Lists items, optionally forcing a refresh, and applies a filter.
pub struct GetItems {
  repository: Arc<Repository>,
}

impl GetItems {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for GetItems {
  type Request = GetItemsRequest;
  type Response = Vec<Item>;

  async fn execute(&self, request: GetItemsRequest) -> UseCaseResult<Vec<Item>> {
    if request.force_update {
      self.repository.invalidate();
    }
    let items = self.repository.list().await?;
    Ok(request.filter.apply(items))
  }
}

/// Fetches one item by id.
pub struct GetItem {
  repository: Arc<Repository>,
}

impl GetItem {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for GetItem {
  type Request = String;
  type Response = Item;

  async fn execute(&self, id: String) -> UseCaseResult<Item> {
    Ok(self.repository.get(&id).await?)
  }
}

/// Creates or updates an item. Items with neither title nor description are rejected.
pub struct SaveItem {
  repository: Arc<Repository>,
}

impl SaveItem {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for SaveItem {
  type Request = Item;
  type Response = Item;

  async fn execute(&self, item: Item) -> UseCaseResult<Item> {
    if item.is_empty() {
      return Err(UseCaseError::InvalidRequest(
        "an item needs a title or a description".to_string(),
      ));
    }
    self.repository.save(item.clone())?;
    Ok(item)
  }
}

/// Removes one item from every tier.
pub struct DeleteItem {
  repository: Arc<Repository>,
}

impl DeleteItem {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for DeleteItem {
  type Request = String;
  type Response = ();

  async fn execute(&self, id: String) -> UseCaseResult<()> {
    Ok(self.repository.delete(&id)?)
  }
}
