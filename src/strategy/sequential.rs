use std::time::Duration;

use crate::error::StrategyError;
use crate::strategy::{LoadStrategy, StepContext, StepResult, StrategyState};
use crate::task::LoadAction;

/// Runs an ordered list of sub-strategies to completion, one at a time,
/// with a fixed pause between them.
///
/// Each step delegates to the current sub-strategy, handing it its own
/// previous state and the same running count this strategy received.
/// Non-terminal sub-results are forwarded unchanged. When a sub-strategy
/// finishes, its final items are still forwarded, the delay for that step
/// becomes `interval_between`, and the carried sub-state is cleared so the
/// next sub-strategy starts fresh. The sequence is terminal once the index
/// passes the end of the list.
pub struct Sequential {
    interval_between: Duration,
    strategies: Vec<Box<dyn LoadStrategy>>,
}

/// Active sub-strategy index plus its opaque state; `inner` is `None` when
/// the next step should start a fresh sub-strategy.
struct SequentialState {
    index: usize,
    inner: Option<StrategyState>,
}

impl Sequential {
    pub fn new(interval_between: Duration) -> Self {
        Self {
            interval_between,
            strategies: Vec::new(),
        }
    }

    /// Append a sub-strategy. Call before the first step; an empty
    /// sequence fails when stepped.
    pub fn push(&mut self, strategy: impl LoadStrategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Chaining variant of [`push`](Self::push).
    pub fn with(mut self, strategy: impl LoadStrategy + 'static) -> Self {
        self.push(strategy);
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl LoadStrategy for Sequential {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError> {
        if self.strategies.is_empty() {
            return Err(StrategyError::EmptySequence);
        }

        let (index, inner_previous) = match ctx.previous {
            None => (0, None),
            Some(previous) => {
                let previous: SequentialState = previous.unpack("Sequential")?;
                match previous.inner {
                    Some(inner) => (previous.index, Some(inner)),
                    None => (previous.index + 1, None),
                }
            }
        };

        if index >= self.strategies.len() {
            return Ok(StepResult::finished());
        }

        tracing::debug!(index, total = self.strategies.len(), "sequential step");

        let sub = self.strategies[index].step(
            action,
            StepContext::new(inner_previous, ctx.currently_running),
        )?;

        let (next_delay, inner) = match sub.next_delay {
            Some(delay) => (delay, Some(sub.state)),
            None => (self.interval_between, None),
        };

        Ok(StepResult {
            next_delay: Some(next_delay),
            items: sub.items,
            state: StrategyState::new(SequentialState { index, inner }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::{collect_bursts, noop_action};
    use crate::strategy::{OneShot, RepeatingBurst, SteppedBurst};

    #[test]
    fn runs_one_shots_in_order() {
        let action = noop_action();
        let strategy = Sequential::new(Duration::ZERO)
            .with(OneShot::new(10))
            .with(OneShot::new(20))
            .with(OneShot::new(30));

        let bursts = collect_bursts(&strategy, &action).unwrap();

        // Each one-shot burst, a pause step after it, then the end of the
        // list.
        assert_eq!(bursts, vec![10, 20, 30, 0]);
        assert_eq!(bursts.iter().sum::<usize>(), 60);
    }

    #[test]
    fn composes_heterogeneous_sub_strategies() {
        let action = noop_action();
        let strategy = Sequential::new(Duration::ZERO)
            .with(SteppedBurst::new(1, 1, 3, Duration::ZERO).unwrap())
            .with(RepeatingBurst::new(4, Duration::ZERO, Duration::from_millis(1)))
            .with(OneShot::new(5));

        let bursts = collect_bursts(&strategy, &action).unwrap();

        // [1, 2, 3] from the ramp, at least one burst of 4 from the
        // repeater, then the one-shot's 5.
        assert_eq!(&bursts[..3], &[1, 2, 3]);
        assert!(bursts.contains(&4));
        assert!(bursts.contains(&5));
    }

    #[test]
    fn nests_inside_itself() {
        let action = noop_action();
        let inner = Sequential::new(Duration::ZERO)
            .with(OneShot::new(2))
            .with(OneShot::new(4));
        let outer = Sequential::new(Duration::ZERO)
            .with(inner)
            .with(OneShot::new(6));

        let bursts = collect_bursts(&outer, &action).unwrap();

        assert_eq!(bursts.iter().sum::<usize>(), 12);
    }

    #[test]
    fn uses_the_pause_after_each_sub_strategy() {
        let action = noop_action();
        let pause = Duration::from_millis(250);
        let strategy = Sequential::new(pause)
            .with(OneShot::new(1))
            .with(OneShot::new(1));

        let result = strategy.step(&action, StepContext::first()).unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.next_delay, Some(pause));
    }

    #[test]
    fn empty_sequence_is_a_step_error() {
        let action = noop_action();
        let strategy = Sequential::new(Duration::ZERO);
        assert!(strategy.is_empty());

        let err = strategy.step(&action, StepContext::first()).unwrap_err();

        assert!(matches!(err, StrategyError::EmptySequence));
    }

    #[test]
    fn push_appends_in_order() {
        let mut strategy = Sequential::new(Duration::ZERO);
        strategy.push(OneShot::new(1));
        strategy.push(OneShot::new(2));

        assert_eq!(strategy.len(), 2);
        assert!(!strategy.is_empty());
    }

    #[test]
    fn foreign_state_is_rejected() {
        let action = noop_action();
        let strategy = Sequential::new(Duration::ZERO).with(OneShot::new(1));

        let ctx = StepContext::new(Some(StrategyState::new(0_usize)), 0);
        let err = strategy.step(&action, ctx).unwrap_err();

        assert!(matches!(
            err,
            StrategyError::StateMismatch {
                strategy: "Sequential"
            }
        ));
    }
}
