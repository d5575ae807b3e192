use async_trait::async_trait;
use std::sync::Arc;

use crate::pipeline::{UseCase, UseCaseResult};
use crate::repository::Repository;

/// Marks an item completed.
pub struct CompleteItem {
  repository: Arc<Repository>,
}

impl CompleteItem {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for CompleteItem {
  type Request = String;
  type Response = ();

  async fn execute(&self, id: String) -> UseCaseResult<()> {
    Ok(self.repository.mark_complete(&id)?)
  }
}

/// Marks an item active again.
pub struct ActivateItem {
  repository: Arc<Repository>,
}

impl ActivateItem {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for ActivateItem {
  type Request = String;
  type Response = ();

  async fn execute(&self, id: String) -> UseCaseResult<()> {
    Ok(self.repository.mark_active(&id)?)
  }
}

/// Deletes every completed item.
pub struct ClearCompletedItems {
  repository: Arc<Repository>,
}

impl ClearCompletedItems {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for ClearCompletedItems {
  type Request = ();
  type Response = ();

  async fn execute(&self, _request: ()) -> UseCaseResult<()> {
    Ok(self.repository.clear_completed()?)
  }
}
