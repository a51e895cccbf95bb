//! The work item contract: what a single unit of load looks like and how
//! the engine wraps the caller's action into measurable, failure-isolated
//! items.
//!
//! The caller supplies one async action per run. [`LoadAction`] wraps it so
//! that every minted [`WorkItem`] measures its own wall-clock duration and
//! captures its own failure: a failing item resolves to a [`TaskOutcome`]
//! instead of propagating, so one bad item never stops the scheduler or any
//! other in-flight item.

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure raised by a work item.
///
/// `kind` is the grouping key used by
/// [`RunSummary::failures_by_kind`](crate::report::RunSummary): items that
/// fail for the same reason should share a kind.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct TaskError {
    kind: String,
    message: String,
}

impl TaskError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Wraps any error, using its (unqualified) type name as the kind.
    pub fn caught<E: std::error::Error>(err: E) -> Self {
        let full = type_name::<E>();
        let kind = full.rsplit("::").next().unwrap_or(full);
        Self::new(kind, err.to_string())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of one executed work item. The duration is measured even when
/// the item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub duration: Duration,
    pub error: Option<TaskError>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One unit of load, inert until the driver spawns it.
pub struct WorkItem {
    future: BoxFuture<'static, TaskOutcome>,
}

impl WorkItem {
    pub(crate) fn into_future(self) -> BoxFuture<'static, TaskOutcome> {
        self.future
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WorkItem")
    }
}

/// The work-item factory handed to strategies at every step.
///
/// Built once per run from the caller's action; each [`issue`](Self::issue)
/// mints one item. The engine never retains the action beyond the run.
#[derive(Clone)]
pub struct LoadAction {
    inner: Arc<dyn Fn() -> BoxFuture<'static, Result<(), TaskError>> + Send + Sync>,
}

impl LoadAction {
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move || action().boxed()),
        }
    }

    /// Mint one work item. The returned future times the action and folds
    /// its failure into the outcome.
    pub fn issue(&self) -> WorkItem {
        let inner = Arc::clone(&self.inner);
        WorkItem {
            future: async move {
                let started = Instant::now();
                let error = inner().await.err();
                TaskOutcome {
                    duration: started.elapsed(),
                    error,
                }
            }
            .boxed(),
        }
    }

    /// Mint `count` items, in order.
    pub fn issue_many(&self, count: u32) -> Vec<WorkItem> {
        (0..count).map(|_| self.issue()).collect()
    }
}

impl fmt::Debug for LoadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadAction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("simulated timeout")]
    struct TimeoutError;

    #[tokio::test]
    async fn issued_item_measures_duration() {
        let action = LoadAction::new(|| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, TaskError>(())
        });

        let outcome = action.issue().into_future().await;

        assert!(outcome.is_success());
        assert!(outcome.duration >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn issued_item_captures_failure_with_duration() {
        let action = LoadAction::new(|| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(TaskError::new("timeout", "simulated timeout"))
        });

        let outcome = action.issue().into_future().await;

        let error = outcome.error.expect("outcome should carry the failure");
        assert_eq!(error.kind(), "timeout");
        assert!(outcome.duration >= Duration::from_millis(20));
    }

    #[test]
    fn issue_many_mints_requested_count() {
        let action = LoadAction::new(|| async { Ok::<_, TaskError>(()) });

        assert_eq!(action.issue_many(0).len(), 0);
        assert_eq!(action.issue_many(7).len(), 7);
    }

    #[test]
    fn caught_uses_unqualified_type_name_as_kind() {
        let err = TaskError::caught(TimeoutError);

        assert_eq!(err.kind(), "TimeoutError");
        assert_eq!(err.message(), "simulated timeout");
    }
}
