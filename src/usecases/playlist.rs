use async_trait::async_trait;

use crate::model::Playlist;
use crate::pipeline::{UseCase, UseCaseError, UseCaseResult};

/// Moves a playlist to its following item.
#[derive(Debug, Default)]
pub struct NextItem;

#[async_trait]
impl UseCase for NextItem {
  type Request = Playlist;
  type Response = Playlist;

  async fn execute(&self, mut playlist: Playlist) -> UseCaseResult<Playlist> {
    if playlist.next_item().is_none() {
      return Err(UseCaseError::DataNotAvailable);
    }
    Ok(playlist)
  }
}

/// Moves a playlist to its preceding item.
#[derive(Debug, Default)]
pub struct PreviousItem;

#[async_trait]
impl UseCase for PreviousItem {
  type Request = Playlist;
  type Response = Playlist;

  async fn execute(&self, mut playlist: Playlist) -> UseCaseResult<Playlist> {
    if playlist.previous_item().is_none() {
      return Err(UseCaseError::DataNotAvailable);
    }
    Ok(playlist)
  }
}
