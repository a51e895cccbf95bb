//! Packhorse — a strategy-driven load-generation engine.
//!
//! You hand the engine one async action and one scheduling strategy; it
//! steps the strategy, launches the work items each step asks for, and
//! reduces every outcome into a [`RunSummary`].
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`LoadStrategy`]: a scheduling policy stepped by the driver. Each step
//!   decides how many items to launch now and when to check back, threading
//!   its own opaque state between steps. Primitives cover one-shot bursts,
//!   repeating bursts, steady and ramping concurrency; [`Sequential`]
//!   composes any of them (itself included) in order.
//! - [`run`]: the driver loop. It spawns each step's items onto a private
//!   tokio runtime, sleeps the strategy's pacing delay on the calling
//!   thread, and, once the strategy signals it is finished, drains every
//!   in-flight item.
//! - [`TaskOutcome`] / [`RunAggregate`] / [`RunSummary`]: one measured
//!   sample per item, the raw accumulation over the run, and the derived
//!   statistics. Failures are data here: a failing or panicking item is
//!   recorded and never aborts the run.
//! - [`ProgressSink`]: the reporting boundary for consoles and progress
//!   bars. The engine itself only emits `tracing` events.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use packhorse::strategy::RepeatingBurst;
//! use packhorse::{run, RunOptions, TaskError};
//!
//! let summary = run(
//!     || async {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         Ok::<_, TaskError>(())
//!     },
//!     RunOptions::builder()
//!         .name("smoke")
//!         .strategy(Box::new(RepeatingBurst::new(
//!             10,
//!             Duration::from_secs(1),
//!             Duration::from_secs(10),
//!         )))
//!         .build(),
//! )
//! .unwrap();
//!
//! assert_eq!(summary.total, 100);
//! ```

/// Raw accumulation of work item outcomes
pub mod aggregate;
/// Construction, protocol, and driver errors
pub mod error;
/// Run summaries and the reporting hook surface
pub mod report;
/// The driver loop that executes a strategy
pub mod runner;
/// Scheduling policies and the step protocol
pub mod strategy;
/// The work item contract
pub mod task;

pub use aggregate::RunAggregate;
pub use error::{ConfigError, RunError, StrategyError};
pub use report::{ProgressSink, RunSummary};
pub use runner::{run, RunOptions};
pub use strategy::{
    ConstantConcurrency, LoadStrategy, OneShot, RepeatingBurst, Sequential, StepContext,
    StepResult, SteppedBurst, SteppedConcurrency, StrategyState,
};
pub use task::{LoadAction, TaskError, TaskOutcome, WorkItem};
