use std::time::{Duration, Instant};

use crate::error::StrategyError;
use crate::strategy::{LoadStrategy, StepContext, StepResult, StrategyState};
use crate::task::LoadAction;

/// Fires `count_per_interval` items every `interval` until `total_duration`
/// has elapsed.
///
/// The clock starts on the first step. A burst whose interval begins at or
/// after the deadline is suppressed: the step returns terminal instead.
#[derive(Debug, Clone, Copy)]
pub struct RepeatingBurst {
    count_per_interval: u32,
    interval: Duration,
    total_duration: Duration,
}

/// Carried across steps: the run clock plus an iteration counter kept for
/// diagnostics only.
struct BurstState {
    started_at: Instant,
    iteration: u32,
}

impl RepeatingBurst {
    pub fn new(count_per_interval: u32, interval: Duration, total_duration: Duration) -> Self {
        Self {
            count_per_interval,
            interval,
            total_duration,
        }
    }
}

impl LoadStrategy for RepeatingBurst {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError> {
        let state = match ctx.previous {
            None => BurstState {
                started_at: Instant::now(),
                iteration: 1,
            },
            Some(previous) => {
                let previous: BurstState = previous.unpack("RepeatingBurst")?;
                BurstState {
                    started_at: previous.started_at,
                    iteration: previous.iteration + 1,
                }
            }
        };

        if state.started_at.elapsed() >= self.total_duration {
            return Ok(StepResult::finished());
        }

        tracing::debug!(iteration = state.iteration, "repeating burst");

        Ok(StepResult {
            next_delay: Some(self.interval),
            items: action.issue_many(self.count_per_interval),
            state: StrategyState::new(state),
        })
    }
}
