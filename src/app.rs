use crate::commands::Command;
use crate::config::Config;
use crate::model::{Item, Playlist, Statistics};
use crate::pipeline::{MainContext, TokioScheduler, UseCase, UseCaseHandler, UseCaseResult};
use crate::repository::Repository;
use crate::source::{DataSource, LocalStore, RemoteService};
use crate::usecases::{
  ActivateItem, ClearCompletedItems, CompleteItem, DeleteItem, GetItem, GetItems,
  GetItemsRequest, GetStatistics, NextItem, PreviousItem, SaveItem,
};
use color_eyre::{eyre::eyre, Result};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tracing::{debug, info};

type Slot<T> = Arc<Mutex<Option<UseCaseResult<T>>>>;

/// Wires the storage tiers, repository and pipeline together and runs
/// one command at a time.
pub struct App {
  repository: Arc<Repository>,
  handler: UseCaseHandler,
  main: MainContext,
}

impl App {
  /// Build the app from configuration. Must be called inside a tokio runtime.
  pub fn new(config: &Config) -> Result<Self> {
    let local = match &config.store.path {
      Some(path) => LocalStore::open(path)?,
      None => LocalStore::open_default()?,
    };
    let remote = RemoteService::new(config.remote.latency());

    info!(
      use_remote = config.use_remote,
      latency_ms = config.remote.latency_ms,
      "Catalog starting"
    );

    Ok(Self::with_sources(
      Arc::new(local),
      Arc::new(remote),
      config.use_remote,
    ))
  }

  pub fn with_sources(
    local: Arc<dyn DataSource>,
    remote: Arc<dyn DataSource>,
    use_remote: bool,
  ) -> Self {
    let repository = Arc::new(Repository::new(local, remote).with_use_remote(use_remote));
    let (scheduler, main) = TokioScheduler::new(Handle::current());

    Self {
      repository,
      handler: UseCaseHandler::new(scheduler),
      main,
    }
  }

  /// Run a command and return the text to print.
  pub async fn run(&mut self, command: Command) -> Result<String> {
    debug!(?command, "Running command");
    let repository = Arc::clone(&self.repository);

    match command {
      Command::List {
        refresh,
        filter,
        json,
      } => {
        let request = GetItemsRequest {
          force_update: refresh,
          filter,
        };
        let items = self.submit(GetItems::new(repository), request).await?;
        if json {
          Ok(serde_json::to_string_pretty(&items)?)
        } else {
          Ok(render_list(&items))
        }
      }
      Command::Get { id, json } => {
        let item = self.submit(GetItem::new(repository), id).await?;
        if json {
          Ok(serde_json::to_string_pretty(&item)?)
        } else {
          Ok(render_item(&item))
        }
      }
      Command::Add {
        title,
        description,
        media,
      } => {
        let mut item = Item::new(Some(title), description);
        if let Some(media) = media {
          item = item.with_media_ref(media);
        }
        let saved = self.submit(SaveItem::new(repository), item).await?;
        Ok(format!("Added {}", saved.id()))
      }
      Command::Complete { id } => {
        self.submit(CompleteItem::new(repository), id.clone()).await?;
        Ok(format!("Completed {}", id))
      }
      Command::Activate { id } => {
        self.submit(ActivateItem::new(repository), id.clone()).await?;
        Ok(format!("Activated {}", id))
      }
      Command::Delete { id } => {
        self.submit(DeleteItem::new(repository), id.clone()).await?;
        Ok(format!("Deleted {}", id))
      }
      Command::ClearCompleted => {
        self.submit(ClearCompletedItems::new(repository), ()).await?;
        Ok("Cleared completed items".to_string())
      }
      Command::Next { id } => self.step(repository, &id, NextItem).await,
      Command::Previous { id } => self.step(repository, &id, PreviousItem).await,
      Command::Stats { json } => {
        let stats = self.submit(GetStatistics::new(repository), ()).await?;
        if json {
          Ok(serde_json::to_string_pretty(&stats)?)
        } else {
          Ok(render_statistics(&stats))
        }
      }
    }
  }

  /// Move from `id` to its neighbour in catalog order.
  async fn step<U>(&mut self, repository: Arc<Repository>, id: &str, use_case: U) -> Result<String>
  where
    U: UseCase<Request = Playlist, Response = Playlist>,
  {
    let items = self
      .submit(GetItems::new(repository), GetItemsRequest::default())
      .await?;

    let mut playlist = Playlist::new(items);
    if !playlist.select(id) {
      return Err(eyre!("Item {} is not in the catalog", id));
    }

    let playlist = self.submit(use_case, playlist).await?;
    let item = playlist
      .current()
      .ok_or_else(|| eyre!("Playlist is empty"))?;
    Ok(render_item(item))
  }

  /// Submit a use case and drive the main context until its result arrives.
  async fn submit<U: UseCase>(&mut self, use_case: U, request: U::Request) -> Result<U::Response> {
    let slot: Slot<U::Response> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&slot);

    self.handler.execute(&Arc::new(use_case), request, move |result| {
      if let Ok(mut sink) = sink.lock() {
        *sink = Some(result);
      }
    });

    loop {
      if let Some(result) = take(&slot) {
        return Ok(result?);
      }
      if !self.main.run_next().await {
        return Err(eyre!("Use case pipeline closed before delivering a result"));
      }
    }
  }
}

fn take<T>(slot: &Slot<T>) -> Option<UseCaseResult<T>> {
  slot.lock().ok().and_then(|mut slot| slot.take())
}

fn render_list(items: &[Item]) -> String {
  if items.is_empty() {
    return "No items".to_string();
  }

  let mut out = String::new();
  for item in items {
    let mark = if item.is_completed() { "x" } else { " " };
    let _ = writeln!(
      out,
      "[{}] {:<40} {}",
      mark,
      item.title_for_list().unwrap_or("(untitled)"),
      item.id()
    );
  }
  out.trim_end().to_string()
}

fn render_item(item: &Item) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "id:          {}", item.id());
  let _ = writeln!(out, "title:       {}", item.title().unwrap_or("-"));
  let _ = writeln!(out, "description: {}", item.description().unwrap_or("-"));
  let _ = writeln!(
    out,
    "media:       {}",
    item.media_ref().map_or("-", |media| media.as_str())
  );
  let status = if item.is_completed() { "completed" } else { "active" };
  let _ = write!(out, "status:      {}", status);
  out
}

fn render_statistics(stats: &Statistics) -> String {
  format!(
    "active:    {}\ncompleted: {}\ntotal:     {}",
    stats.active,
    stats.completed,
    stats.total()
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::ItemFilter;
  use crate::pipeline::UseCaseError;
  use std::time::Duration;

  fn app(remote_items: Vec<Item>) -> (App, Arc<LocalStore>) {
    let local = Arc::new(LocalStore::open_in_memory().unwrap());
    let remote = Arc::new(RemoteService::with_items(Duration::ZERO, remote_items));
    (App::with_sources(local.clone(), remote, true), local)
  }

  fn list(filter: ItemFilter) -> Command {
    Command::List {
      refresh: false,
      filter,
      json: false,
    }
  }

  #[tokio::test]
  async fn test_list_seeds_from_remote() {
    let (mut app, local) = app(crate::source::seed_catalog());

    let out = app.run(list(ItemFilter::All)).await.unwrap();
    assert!(out.contains("One Punch Man Theme"));
    assert!(out.contains("Transistor OST"));
    assert_eq!(local.list().await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_add_complete_and_stats() {
    let (mut app, _local) = app(vec![]);

    let out = app
      .run(Command::Add {
        title: "Song".to_string(),
        description: None,
        media: Some("song.mp3".to_string()),
      })
      .await
      .unwrap();
    let id = out.strip_prefix("Added ").unwrap().to_string();

    app.run(Command::Complete { id: id.clone() }).await.unwrap();

    let stats = app.run(Command::Stats { json: true }).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(value["active"], 0);
    assert_eq!(value["completed"], 1);

    let shown = app.run(Command::Get { id, json: false }).await.unwrap();
    assert!(shown.contains("song.mp3"));
    assert!(shown.contains("completed"));
  }

  #[tokio::test]
  async fn test_clear_completed_and_filter() {
    let (mut app, _local) = app(vec![
      Item::with_id("a", Some("Kept".to_string()), None),
      Item::with_id("b", Some("Done".to_string()), None).with_completed(true),
    ]);

    let completed = app.run(list(ItemFilter::Completed)).await.unwrap();
    assert!(completed.contains("Done"));
    assert!(!completed.contains("Kept"));

    app.run(Command::ClearCompleted).await.unwrap();
    let all = app.run(list(ItemFilter::All)).await.unwrap();
    assert!(all.contains("Kept"));
    assert!(!all.contains("Done"));
  }

  #[tokio::test]
  async fn test_empty_catalog_is_an_error() {
    let (mut app, _local) = app(vec![]);
    let err = app.run(list(ItemFilter::All)).await.unwrap_err();
    assert_eq!(
      err.downcast_ref::<UseCaseError>(),
      Some(&UseCaseError::DataNotAvailable)
    );
  }

  #[tokio::test]
  async fn test_add_with_media_reads_back() {
    let (mut app, local) = app(vec![]);

    let out = app
      .run(Command::Add {
        title: "Theme".to_string(),
        description: Some("Opening".to_string()),
        media: Some("https://example.com/theme".to_string()),
      })
      .await
      .unwrap();
    let id = out.strip_prefix("Added ").unwrap().to_string();

    let json = app
      .run(Command::Get {
        id: id.clone(),
        json: true,
      })
      .await
      .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["media_ref"], "https://example.com/theme");

    let stored = local.get(&id).await.unwrap();
    assert_eq!(
      stored.media_ref().map(|media| media.as_str()),
      Some("https://example.com/theme")
    );
  }

  #[tokio::test]
  async fn test_next_and_previous_wrap_around_catalog() {
    let (mut app, _local) = app(vec![
      Item::with_id("a", Some("First".to_string()), None),
      Item::with_id("b", Some("Second".to_string()), None),
    ]);

    let next = app.run(Command::Next { id: "b".to_string() }).await.unwrap();
    assert!(next.contains("First"));

    let previous = app
      .run(Command::Previous { id: "a".to_string() })
      .await
      .unwrap();
    assert!(previous.contains("Second"));

    let err = app
      .run(Command::Next { id: "zzz".to_string() })
      .await
      .unwrap_err();
    assert!(err.to_string().contains("not in the catalog"));
  }

  #[test]
  fn test_render_empty_list() {
    assert_eq!(render_list(&[]), "No items");
  }
}
