use std::time::{Duration, Instant};

use crate::error::{ConfigError, StrategyError};
use crate::strategy::{
    advance_level, ramp_finished, validate_ramp, LoadStrategy, StepContext, StepResult,
    StrategyState,
};
use crate::task::LoadAction;

/// Like [`ConstantConcurrency`] with a target that ramps from `from` to
/// `to` over time instead of staying fixed.
///
/// Two independent timers are carried in state: the step timer resets every
/// time the target advances, the total timer never resets. On each check
/// the ramp advance is evaluated first, then the top-up is computed against
/// the possibly-updated target.
///
/// [`ConstantConcurrency`]: crate::strategy::ConstantConcurrency
#[derive(Debug, Clone, Copy)]
pub struct SteppedConcurrency {
    step: i32,
    from: u32,
    to: u32,
    step_interval: Duration,
    check_interval: Duration,
    total_duration: Duration,
}

struct RampState {
    current: u32,
    step_started_at: Instant,
    total_started_at: Instant,
}

impl SteppedConcurrency {
    /// The ramp rules of [`SteppedBurst::new`] apply, plus
    /// `step_interval >= check_interval` and `total_duration >=
    /// step_interval`. For a fixed target use [`ConstantConcurrency`]
    /// instead.
    ///
    /// [`SteppedBurst::new`]: crate::strategy::SteppedBurst::new
    /// [`ConstantConcurrency`]: crate::strategy::ConstantConcurrency
    pub fn new(
        step: i32,
        from: u32,
        to: u32,
        step_interval: Duration,
        check_interval: Duration,
        total_duration: Duration,
    ) -> Result<Self, ConfigError> {
        validate_ramp(step, from, to)?;
        if step_interval < check_interval {
            return Err(ConfigError::StepIntervalTooShort {
                step_interval,
                check_interval,
            });
        }
        if total_duration < step_interval {
            return Err(ConfigError::DurationTooShort {
                total_duration,
                step_interval,
            });
        }
        Ok(Self {
            step,
            from,
            to,
            step_interval,
            check_interval,
            total_duration,
        })
    }
}

impl LoadStrategy for SteppedConcurrency {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError> {
        let state = match ctx.previous {
            None => RampState {
                current: self.from,
                step_started_at: Instant::now(),
                total_started_at: Instant::now(),
            },
            Some(previous) => {
                let mut state: RampState = previous.unpack("SteppedConcurrency")?;
                if state.step_started_at.elapsed() >= self.step_interval
                    && !ramp_finished(self.from, self.to, state.current)
                {
                    state.current = advance_level(state.current, self.step, self.from, self.to);
                    state.step_started_at = Instant::now();
                }
                state
            }
        };

        if state.total_started_at.elapsed() >= self.total_duration {
            return Ok(StepResult::finished());
        }

        let top_up = (state.current as usize).saturating_sub(ctx.currently_running) as u32;

        Ok(StepResult {
            next_delay: Some(self.check_interval),
            items: action.issue_many(top_up),
            state: StrategyState::new(state),
        })
    }
}
