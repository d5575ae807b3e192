//! Asynchronous use case pipeline.
//!
//! A [`UseCase`] is one business operation with a request and a response
//! type. Callers submit `(use_case, request, callback)` to a
//! [`UseCaseHandler`]; its [`Scheduler`] decides where the use case runs and
//! where the callback fires.
//!
//! # Example
//!
//! ```ignore
//! let (scheduler, mut main) = TokioScheduler::new(Handle::current());
//! let handler = UseCaseHandler::new(scheduler);
//!
//! handler.execute(&get_items, GetItemsRequest::default(), |result| match result {
//!     Ok(items) => render(items),
//!     Err(e) => show_error(e),
//! });
//!
//! // In the event loop
//! main.run_next().await;
//! ```

mod scheduler;

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::source::DataError;

pub use scheduler::{Delivery, ImmediateScheduler, MainContext, Scheduler, TokioScheduler};

/// Why a use case failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UseCaseError {
  #[error("data not available")]
  DataNotAvailable,
  #[error("invalid request: {0}")]
  InvalidRequest(String),
  #[error("storage error: {0}")]
  Storage(String),
  /// The use case panicked before producing a result.
  #[error("use case panicked")]
  Panicked,
}

impl From<DataError> for UseCaseError {
  fn from(err: DataError) -> Self {
    match err {
      DataError::NotAvailable => UseCaseError::DataNotAvailable,
      DataError::Storage(reason) => UseCaseError::Storage(reason),
    }
  }
}

pub type UseCaseResult<T> = Result<T, UseCaseError>;

/// A single business operation.
///
/// Returning one `Result` per call means every execution ends in exactly one
/// success or one error.
#[async_trait]
pub trait UseCase: Send + Sync + 'static {
  type Request: Send + 'static;
  type Response: Send + 'static;

  async fn execute(&self, request: Self::Request) -> UseCaseResult<Self::Response>;
}

/// Submits use cases to a scheduler and routes their results to callbacks.
///
/// No retries, deduplication or cancellation: a submitted use case runs to
/// completion and its callback is delivered once. A panicking use case is
/// reported as [`UseCaseError::Panicked`].
#[derive(Clone)]
pub struct UseCaseHandler {
  scheduler: Arc<dyn Scheduler>,
}

impl UseCaseHandler {
  pub fn new(scheduler: impl Scheduler + 'static) -> Self {
    Self {
      scheduler: Arc::new(scheduler),
    }
  }

  pub fn execute<U, F>(&self, use_case: &Arc<U>, request: U::Request, callback: F)
  where
    U: UseCase,
    F: FnOnce(UseCaseResult<U::Response>) + Send + 'static,
  {
    let use_case = Arc::clone(use_case);
    let scheduler = Arc::clone(&self.scheduler);
    let name = std::any::type_name::<U>();

    self.scheduler.execute(Box::pin(async move {
      debug!(use_case = name, "Executing use case");
      let result = AssertUnwindSafe(use_case.execute(request))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
          warn!(use_case = name, "Use case panicked");
          Err(UseCaseError::Panicked)
        });
      if let Err(e) = &result {
        debug!(use_case = name, "Use case failed: {}", e);
      }
      scheduler.deliver(Box::new(move || callback(result)));
    }));
  }
}
