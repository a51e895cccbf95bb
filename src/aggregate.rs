//! Raw accumulation of work item outcomes.
//!
//! The aggregate stores only mergeable raw data (counts, a duration sum,
//! per-kind failure counters); derived statistics such as averages and the
//! ordered failure table belong to [`RunSummary`](crate::report::RunSummary),
//! which is built from the aggregate once the drain completes.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::task::TaskOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAggregate {
    pub total: usize,
    pub succeeded: usize,
    pub total_duration: Duration,
    pub failures: HashMap<String, usize>,
}

impl RunAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incorporate one outcome.
    pub fn consume(&mut self, outcome: &TaskOutcome) {
        self.total += 1;
        self.total_duration += outcome.duration;
        match &outcome.error {
            None => self.succeeded += 1,
            Some(error) => {
                *self.failures.entry(error.kind().to_string()).or_default() += 1;
            }
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskError;

    fn success(millis: u64) -> TaskOutcome {
        TaskOutcome {
            duration: Duration::from_millis(millis),
            error: None,
        }
    }

    fn failure(kind: &str) -> TaskOutcome {
        TaskOutcome {
            duration: Duration::from_millis(1),
            error: Some(TaskError::new(kind, "boom")),
        }
    }

    #[test]
    fn counts_split_by_outcome() {
        let mut agg = RunAggregate::new();
        agg.consume(&success(10));
        agg.consume(&success(30));
        agg.consume(&failure("timeout"));
        agg.consume(&failure("timeout"));
        agg.consume(&failure("refused"));

        assert_eq!(agg.total, 5);
        assert_eq!(agg.succeeded, 2);
        assert_eq!(agg.failed(), 3);
        assert_eq!(agg.failures["timeout"], 2);
        assert_eq!(agg.failures["refused"], 1);
    }

    #[test]
    fn duration_sum_includes_failed_items() {
        let mut agg = RunAggregate::new();
        agg.consume(&success(10));
        agg.consume(&failure("timeout"));

        assert_eq!(agg.total_duration, Duration::from_millis(11));
    }
}
