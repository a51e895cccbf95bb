//! Error types used by the engine.
//!
//! Errors are split by layer:
//!
//! - [`ConfigError`] — invalid strategy parameters, raised at construction.
//! - [`StrategyError`] — step-protocol misuse, raised while stepping.
//! - [`RunError`] — anything that prevents a run from producing a summary.
//!
//! Work-item failures are deliberately *not* errors at this level: they are
//! captured into [`TaskOutcome`](crate::task::TaskOutcome) and surface only
//! in the aggregated [`RunSummary`](crate::report::RunSummary).

use std::time::Duration;

use thiserror::Error;

/// Invalid strategy parameters, rejected at construction time.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A ramp needs distinct endpoints; a flat "ramp" is a constant load.
    #[error("ramp endpoints must differ (both are {value})")]
    EqualRampEndpoints { value: u32 },

    /// Upward ramps require a positive step.
    #[error("step must be greater than zero when ramping from {from} up to {to}")]
    StepMustBePositive { from: u32, to: u32 },

    /// Downward ramps require a negative step.
    #[error("step must be less than zero when ramping from {from} down to {to}")]
    StepMustBeNegative { from: u32, to: u32 },

    /// The ramp level cannot change more often than it is checked.
    #[error("step interval {step_interval:?} must be at least the check interval {check_interval:?}")]
    StepIntervalTooShort {
        step_interval: Duration,
        check_interval: Duration,
    },

    /// A run shorter than one step interval would never ramp at all.
    #[error("total duration {total_duration:?} must be at least the step interval {step_interval:?}")]
    DurationTooShort {
        total_duration: Duration,
        step_interval: Duration,
    },
}

/// Step-protocol misuse. These are programming errors: the driver stops
/// stepping a strategy the moment it signals terminal, so none of these can
/// occur in a correctly assembled run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StrategyError {
    /// A strategy was handed previous state it did not produce, which
    /// happens when strategies are composed incorrectly.
    #[error("{strategy} was handed step state it did not produce")]
    StateMismatch { strategy: &'static str },

    /// A single-step strategy was stepped again.
    #[error("{strategy} fires once and was stepped again")]
    Exhausted { strategy: &'static str },

    /// A sequential strategy was stepped before any sub-strategy was added.
    #[error("sequential strategy has no sub-strategies")]
    EmptySequence,
}

/// Failure of the driver loop itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunError {
    #[error("load strategy failed: {0}")]
    Strategy(#[from] StrategyError),

    /// The runtime that executes work items could not be built.
    #[error("failed to build work-item runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
