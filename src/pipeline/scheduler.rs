//! Scheduling policies for use case execution and callback delivery.

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::warn;

/// A callback ready to be run on the caller's context.
pub type Delivery = Box<dyn FnOnce() + Send + 'static>;

/// Decides where a use case runs and where its callback is delivered.
pub trait Scheduler: Send + Sync {
  /// Run a use case to completion.
  fn execute(&self, task: BoxFuture<'static, ()>);

  /// Hand a finished use case's callback to the caller.
  fn deliver(&self, delivery: Delivery);
}

/// Production scheduler: use cases run on the tokio runtime and callbacks
/// are queued for a [`MainContext`] owned by the caller.
#[derive(Clone)]
pub struct TokioScheduler {
  handle: Handle,
  tx: mpsc::UnboundedSender<Delivery>,
}

impl TokioScheduler {
  /// Create a scheduler spawning onto `handle`, plus the context that will
  /// receive its callbacks.
  pub fn new(handle: Handle) -> (Self, MainContext) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { handle, tx }, MainContext { rx })
  }
}

impl Scheduler for TokioScheduler {
  fn execute(&self, task: BoxFuture<'static, ()>) {
    self.handle.spawn(task);
  }

  fn deliver(&self, delivery: Delivery) {
    if self.tx.send(delivery).is_err() {
      warn!("Main context is gone, dropping use case callback");
    }
  }
}

/// The caller-designated context on which callbacks run.
///
/// Callbacks only run when the owner drains this context, typically from
/// its event loop.
pub struct MainContext {
  rx: mpsc::UnboundedReceiver<Delivery>,
}

impl MainContext {
  /// Wait for the next callback and run it.
  ///
  /// Returns `false` once every scheduler feeding this context is dropped.
  pub async fn run_next(&mut self) -> bool {
    match self.rx.recv().await {
      Some(delivery) => {
        delivery();
        true
      }
      None => false,
    }
  }

  /// Run every callback that is already queued, without waiting.
  ///
  /// Returns how many callbacks ran.
  pub fn run_pending(&mut self) -> usize {
    let mut ran = 0;
    while let Ok(delivery) = self.rx.try_recv() {
      delivery();
      ran += 1;
    }
    ran
  }
}

/// Deterministic scheduler for tests: runs the use case on the calling
/// thread and invokes its callback before `execute` returns.
///
/// The use case future is driven by a local executor, so it must not depend
/// on the tokio reactor (timers, sockets).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn execute(&self, task: BoxFuture<'static, ()>) {
    futures::executor::block_on(task);
  }

  fn deliver(&self, delivery: Delivery) {
    delivery();
  }
}
