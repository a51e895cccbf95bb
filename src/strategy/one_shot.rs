use crate::error::StrategyError;
use crate::strategy::{LoadStrategy, StepContext, StepResult};
use crate::task::LoadAction;

/// Fires a single burst of `count` items and finishes immediately.
///
/// The one and only step is terminal, so the driver dispatches the burst
/// and goes straight to the drain.
#[derive(Debug, Clone, Copy)]
pub struct OneShot {
    count: u32,
}

impl OneShot {
    pub fn new(count: u32) -> Self {
        Self { count }
    }
}

impl LoadStrategy for OneShot {
    fn step(&self, action: &LoadAction, ctx: StepContext) -> Result<StepResult, StrategyError> {
        if ctx.previous.is_some() {
            return Err(StrategyError::Exhausted { strategy: "OneShot" });
        }

        Ok(StepResult {
            items: action.issue_many(self.count),
            ..StepResult::finished()
        })
    }
}
