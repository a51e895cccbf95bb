use std::time::Duration;

use crate::error::{ConfigError, StrategyError};
use crate::strategy::{
    advance_level, ramp_finished, validate_ramp, LoadStrategy, StepContext, StepResult,
    StrategyState,
};
use crate::task::LoadAction;

/// Fires a burst every `interval`, ramping the burst size linearly from
/// `from` to `to` in increments of `step`.
///
/// The ramp itself defines the end: the boundary burst of size `to` is
/// emitted exactly once, on the terminal step. There is no duration cap.
#[derive(Debug, Clone, Copy)]
pub struct SteppedBurst {
    step: i32,
    from: u32,
    to: u32,
    interval: Duration,
}

struct LevelState {
    current: u32,
}

impl SteppedBurst {
    /// Endpoints must differ and the step sign must match the ramp
    /// direction; for a single fixed burst use [`OneShot`] instead.
    ///
    /// [`OneShot`]: crate::strategy::OneShot
    pub fn new(step: i32, from: u32, to: u32, interval: Duration) -> Result<Self, ConfigError> {
        validate_ramp(step, from, to)?;
        Ok(Self {
            step,
            from,
            to,
            interval,
        })
    }
}

impl LoadStrategy for SteppedBurst {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError> {
        let current = match ctx.previous {
            None => self.from,
            Some(previous) => {
                let previous: LevelState = previous.unpack("SteppedBurst")?;
                advance_level(previous.current, self.step, self.from, self.to)
            }
        };

        let next_delay = if ramp_finished(self.from, self.to, current) {
            None
        } else {
            Some(self.interval)
        };

        Ok(StepResult {
            next_delay,
            items: action.issue_many(current),
            state: StrategyState::new(LevelState { current }),
        })
    }
}
