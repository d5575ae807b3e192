//! Catalog operations runnable through the use case pipeline.

mod items;
mod playlist;
mod status;

use async_trait::async_trait;
use std::sync::Arc;

use crate::model::Statistics;
use crate::pipeline::{UseCase, UseCaseResult};
use crate::repository::Repository;

pub use items::{DeleteItem, GetItem, GetItems, GetItemsRequest, SaveItem};
pub use playlist::{NextItem, PreviousItem};
pub use status::{ActivateItem, ClearCompletedItems, CompleteItem};

/// Counts active and completed items.
pub struct GetStatistics {
  repository: Arc<Repository>,
}

impl GetStatistics {
  pub fn new(repository: Arc<Repository>) -> Self {
    Self { repository }
  }
}

#[async_trait]
impl UseCase for GetStatistics {
  type Request = ();
  type Response = Statistics;

  async fn execute(&self, _request: ()) -> UseCaseResult<Statistics> {
    let items = self.repository.list().await?;
    Ok(Statistics::from_items(&items))
  }
}
