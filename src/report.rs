//! Run summaries and the reporting hook surface.
//!
//! [`RunSummary`] is the pure, derived form of a
//! [`RunAggregate`](crate::aggregate::RunAggregate): averages and the
//! ordered failure table, computed once after the drain. [`ProgressSink`]
//! is the I/O boundary: console rendering and progress bars live behind
//! it, outside the engine.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::RunAggregate;

/// Final statistics for one run. Immutable once built; a completed run
/// always yields a summary, even when every item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Failure kinds with their counts, ordered by descending count; ties
    /// break by kind name so the ordering is deterministic.
    pub failures_by_kind: Vec<(String, usize)>,
    /// Mean work-item duration; zero for a zero-item run.
    pub average_duration: Duration,
    /// Wall-clock time from the first step to the end of the drain.
    pub elapsed: Duration,
}

impl RunSummary {
    pub(crate) fn from_aggregate(aggregate: RunAggregate, elapsed: Duration) -> Self {
        let mut failures_by_kind: Vec<(String, usize)> =
            aggregate.failures.into_iter().collect();
        failures_by_kind.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let average_duration = if aggregate.total == 0 {
            Duration::ZERO
        } else {
            aggregate.total_duration / aggregate.total as u32
        };

        Self {
            total: aggregate.total,
            succeeded: aggregate.succeeded,
            failures_by_kind,
            average_duration,
            elapsed,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} items: {} succeeded, {} failed",
            self.total,
            self.succeeded,
            self.failed()
        )?;
        writeln!(
            f,
            "average duration {:?}, elapsed {:?}",
            self.average_duration, self.elapsed
        )?;
        for (kind, count) in &self.failures_by_kind {
            writeln!(f, "  {kind}: {count}")?;
        }
        Ok(())
    }
}

/// Observer for the driver's reporting hooks.
///
/// Both hooks are purely observational: the engine schedules identically
/// with or without a sink installed.
pub trait ProgressSink: Send {
    /// Called after every step with the number of items just dispatched.
    fn on_step(&self, dispatched: usize);

    /// Called once, after every dispatched item has completed.
    fn on_finish(&self, summary: &RunSummary);
}
