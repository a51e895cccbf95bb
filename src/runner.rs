//! The driver loop: steps a strategy, spawns its work items, and reduces
//! every outcome into a [`RunSummary`].
//!
//! The loop itself is single-threaded and synchronous. It owns a private
//! multi-thread tokio runtime used only to execute work items, so dispatch
//! is fire-and-forget: the driver never waits for individual items between
//! steps, only for the strategy-specified pacing delay.
//!
//! The pause between steps is a plain [`std::thread::sleep`], not a
//! cooperative timer. Strategies measure elapsed wall-clock time with
//! monotonic clocks across the pause, and a timer that could be skewed by
//! migration between execution contexts would distort those measurements.
//!
//! Once the strategy signals terminal, the driver awaits every dispatched
//! item in dispatch order and folds the outcomes into a [`RunSummary`].
//! There is no cancellation path: a run always drains to completion.

use std::future::Future;
use std::thread;
use std::time::{Duration, Instant};

use tokio::runtime;
use tokio::task::JoinHandle;
use typed_builder::TypedBuilder;

use crate::aggregate::RunAggregate;
use crate::error::RunError;
use crate::report::{ProgressSink, RunSummary};
use crate::strategy::{LoadStrategy, StepContext, StepResult};
use crate::task::{LoadAction, TaskError, TaskOutcome};

/// Configuration for one run.
#[derive(TypedBuilder)]
pub struct RunOptions {
    /// The scheduling policy driving the run.
    pub strategy: Box<dyn LoadStrategy>,

    /// Name carried in the run's log events.
    #[builder(default = String::from("load-test"), setter(into))]
    pub name: String,

    /// Optional observer for the step/finish hooks. Scheduling behavior is
    /// identical with or without one.
    #[builder(default, setter(strip_option))]
    pub progress: Option<Box<dyn ProgressSink>>,
}

/// Run `action` under the configured strategy and aggregate every outcome.
///
/// Blocks the calling thread until the strategy finishes and all dispatched
/// items have completed. Must not be called from inside an async runtime;
/// the driver owns its own.
pub fn run<F, Fut>(action: F, options: RunOptions) -> Result<RunSummary, RunError>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    run_action(LoadAction::new(action), options)
}

fn run_action(action: LoadAction, options: RunOptions) -> Result<RunSummary, RunError> {
    let RunOptions {
        strategy,
        name,
        progress,
    } = options;

    // Work items need somewhere to run; the driver loop itself stays on
    // this thread.
    let runtime = runtime::Builder::new_multi_thread().enable_all().build()?;

    tracing::info!(name = %name, "load test starting");
    let started = Instant::now();

    let mut handles: Vec<JoinHandle<TaskOutcome>> = Vec::new();
    let mut state = None;

    loop {
        let currently_running = handles.iter().filter(|h| !h.is_finished()).count();
        let StepResult {
            next_delay,
            items,
            state: next_state,
        } = strategy.step(&action, StepContext::new(state.take(), currently_running))?;

        let dispatched = items.len();
        if dispatched > 0 {
            tracing::debug!(count = dispatched, currently_running, "dispatching work items");
        }
        for item in items {
            handles.push(runtime.spawn(item.into_future()));
        }
        if let Some(sink) = &progress {
            sink.on_step(dispatched);
        }

        match next_delay {
            Some(delay) => {
                state = Some(next_state);
                thread::sleep(delay);
            }
            None => break,
        }
    }

    tracing::info!(in_flight = handles.len(), "strategy finished, draining work items");

    let mut aggregate = RunAggregate::new();
    runtime.block_on(async {
        for handle in handles {
            match handle.await {
                Ok(outcome) => aggregate.consume(&outcome),
                // The task boundary contains panics; record and move on.
                Err(err) => {
                    tracing::warn!(error = %err, "work item panicked");
                    aggregate.consume(&TaskOutcome {
                        duration: Duration::ZERO,
                        error: Some(TaskError::new("panic", err.to_string())),
                    });
                }
            }
        }
    });

    let summary = RunSummary::from_aggregate(aggregate, started.elapsed());
    tracing::info!(
        name = %name,
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed(),
        elapsed = ?summary.elapsed,
        "load test finished"
    );
    if let Some(sink) = &progress {
        sink.on_finish(&summary);
    }

    Ok(summary)
}
