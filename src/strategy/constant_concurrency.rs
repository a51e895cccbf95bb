use std::time::{Duration, Instant};

use crate::error::StrategyError;
use crate::strategy::{LoadStrategy, StepContext, StepResult, StrategyState};
use crate::task::LoadAction;

/// Keeps `target` items in flight, topping up every `check_interval` until
/// `total_duration` has elapsed.
///
/// Each check dispatches only the shortfall between `target` and the
/// driver's running count, never over-provisioning. The final top-up that
/// would land exactly at expiry is suppressed.
#[derive(Debug, Clone, Copy)]
pub struct ConstantConcurrency {
    target: u32,
    check_interval: Duration,
    total_duration: Duration,
}

struct ConstantState {
    started_at: Instant,
}

impl ConstantConcurrency {
    pub fn new(target: u32, check_interval: Duration, total_duration: Duration) -> Self {
        Self {
            target,
            check_interval,
            total_duration,
        }
    }

    /// Shortfall between the target and the running count; bounded by the
    /// target, so the cast back is lossless.
    fn top_up(&self, currently_running: usize) -> u32 {
        (self.target as usize).saturating_sub(currently_running) as u32
    }
}

impl LoadStrategy for ConstantConcurrency {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError> {
        let state = match ctx.previous {
            None => ConstantState {
                started_at: Instant::now(),
            },
            Some(previous) => previous.unpack("ConstantConcurrency")?,
        };

        if state.started_at.elapsed() >= self.total_duration {
            return Ok(StepResult::finished());
        }

        Ok(StepResult {
            next_delay: Some(self.check_interval),
            items: action.issue_many(self.top_up(ctx.currently_running)),
            state: StrategyState::new(state),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::noop_action;

    fn step_with_running(
        strategy: &ConstantConcurrency,
        previous: Option<StrategyState>,
        currently_running: usize,
    ) -> StepResult {
        let action = noop_action();
        strategy
            .step(&action, StepContext::new(previous, currently_running))
            .unwrap()
    }

    #[test]
    fn first_step_fills_to_target() {
        let strategy =
            ConstantConcurrency::new(10, Duration::from_millis(10), Duration::from_secs(5));

        let result = step_with_running(&strategy, None, 0);

        assert_eq!(result.items.len(), 10);
        assert_eq!(result.next_delay, Some(Duration::from_millis(10)));
    }

    #[test]
    fn top_up_covers_only_the_shortfall() {
        let strategy =
            ConstantConcurrency::new(10, Duration::from_millis(10), Duration::from_secs(5));

        let first = step_with_running(&strategy, None, 0);
        let second = step_with_running(&strategy, Some(first.state), 4);

        assert_eq!(second.items.len(), 6);
    }

    #[test]
    fn never_over_provisions_when_running_exceeds_target() {
        let strategy =
            ConstantConcurrency::new(10, Duration::from_millis(10), Duration::from_secs(5));

        let first = step_with_running(&strategy, None, 0);
        let second = step_with_running(&strategy, Some(first.state), 25);

        assert!(second.items.is_empty());
        assert!(!second.is_finished());
    }

    #[test]
    fn terminal_once_the_duration_elapses() {
        let strategy =
            ConstantConcurrency::new(10, Duration::from_millis(10), Duration::from_millis(30));

        let first = step_with_running(&strategy, None, 0);
        std::thread::sleep(Duration::from_millis(40));
        let second = step_with_running(&strategy, Some(first.state), 0);

        assert!(second.is_finished());
        assert!(second.items.is_empty());
    }

    #[test]
    fn foreign_state_is_rejected() {
        let action = noop_action();
        let strategy =
            ConstantConcurrency::new(10, Duration::from_millis(10), Duration::from_secs(5));

        let ctx = StepContext::new(Some(StrategyState::new(123_u8)), 0);
        let err = strategy.step(&action, ctx).unwrap_err();

        assert!(matches!(
            err,
            StrategyError::StateMismatch {
                strategy: "ConstantConcurrency"
            }
        ));
    }
}
