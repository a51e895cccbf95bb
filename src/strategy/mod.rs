//! Load strategies — the step protocol and its implementations.
//!
//! A strategy is a scheduling policy stepped by the driver loop. Each step
//! receives a [`StepContext`] (the strategy's own opaque state from the
//! previous step, plus a best-effort count of items still running) and
//! returns a [`StepResult`] (items to launch now, the delay until the next
//! step, and fresh state). A `None` delay is the terminal signal: the
//! driver never steps the strategy again.
//!
//! Strategy structs hold only their construction parameters; all mutable
//! progress lives in the state value threaded through the result/context
//! pair, so a single driver thread can step the same instance repeatedly
//! without locking.
//!
//! [`Sequential`] satisfies the same [`LoadStrategy`] capability as the
//! primitives, so strategies compose recursively.

mod constant_concurrency;
mod one_shot;
mod repeating_burst;
mod sequential;
mod stepped_burst;
mod stepped_concurrency;

pub use constant_concurrency::ConstantConcurrency;
pub use one_shot::OneShot;
pub use repeating_burst::RepeatingBurst;
pub use sequential::Sequential;
pub use stepped_burst::SteppedBurst;
pub use stepped_concurrency::SteppedConcurrency;

use std::any::Any;
use std::fmt;
use std::time::Duration;

use crate::error::{ConfigError, StrategyError};
use crate::task::{LoadAction, WorkItem};

/// Opaque, strategy-private step state.
///
/// The driver hands a strategy's `state` back verbatim as
/// [`StepContext::previous`] on the next call. Only the strategy that
/// produced a value can unpack it; anything else fails fast with
/// [`StrategyError::StateMismatch`].
pub struct StrategyState(Box<dyn Any + Send>);

impl StrategyState {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Unpack the state for `strategy`, rejecting foreign values.
    pub(crate) fn unpack<T: Any + Send>(self, strategy: &'static str) -> Result<T, StrategyError> {
        self.0
            .downcast::<T>()
            .map(|state| *state)
            .map_err(|_| StrategyError::StateMismatch { strategy })
    }
}

impl fmt::Debug for StrategyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StrategyState(..)")
    }
}

/// The driver's view of the run at the moment of one step.
#[derive(Debug)]
pub struct StepContext {
    /// State this strategy returned from its previous step; `None` only on
    /// the first step of its lifetime.
    pub previous: Option<StrategyState>,
    /// Best-effort count of dispatched items that have not completed yet.
    /// Snapshotted without synchronization; strategies must treat it as
    /// approximate.
    pub currently_running: usize,
}

impl StepContext {
    pub fn new(previous: Option<StrategyState>, currently_running: usize) -> Self {
        Self {
            previous,
            currently_running,
        }
    }

    /// Context for the first step of a strategy's lifetime.
    pub fn first() -> Self {
        Self::new(None, 0)
    }
}

/// One scheduling decision.
#[derive(Debug)]
pub struct StepResult {
    /// Delay until the next step; `None` means the strategy is finished
    /// and must not be stepped again.
    pub next_delay: Option<Duration>,
    /// Items to dispatch now, in order. A terminal result may still carry
    /// items ([`OneShot`] fires its whole burst on its only, terminal step).
    pub items: Vec<WorkItem>,
    /// State the driver hands back on the next step.
    pub state: StrategyState,
}

impl StepResult {
    /// Terminal marker: no delay, no items.
    pub fn finished() -> Self {
        Self {
            next_delay: None,
            items: Vec::new(),
            state: StrategyState::new(()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next_delay.is_none()
    }
}

/// A scheduling policy over the step protocol.
///
/// Implementations are stepped by exactly one driver loop, never
/// concurrently, and are discarded after the run.
pub trait LoadStrategy: Send {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError>;
}

/// Shared ramp validation: endpoints must differ and the step sign must
/// match the ramp direction.
pub(crate) fn validate_ramp(step: i32, from: u32, to: u32) -> Result<(), ConfigError> {
    if from == to {
        return Err(ConfigError::EqualRampEndpoints { value: from });
    }
    if from < to && step <= 0 {
        return Err(ConfigError::StepMustBePositive { from, to });
    }
    if from > to && step >= 0 {
        return Err(ConfigError::StepMustBeNegative { from, to });
    }
    Ok(())
}

/// Next ramp level, clamped at `to` so the boundary level is emitted
/// exactly once even when `step` would jump past it.
pub(crate) fn advance_level(current: u32, step: i32, from: u32, to: u32) -> u32 {
    let next = i64::from(current) + i64::from(step);
    if from < to {
        next.min(i64::from(to)) as u32
    } else {
        next.max(i64::from(to)) as u32
    }
}

/// Whether a ramp that just emitted `current` has reached its boundary.
pub(crate) fn ramp_finished(from: u32, to: u32, current: u32) -> bool {
    (from < to && current >= to) || (from > to && current <= to)
}
