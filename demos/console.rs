//! Sequential one-shot bursts over a deliberately flaky action.
//!
//! Run with `cargo run --example console`; set `RUST_LOG=packhorse=debug`
//! to watch the driver narrate each step.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use packhorse::strategy::{OneShot, Sequential};
use packhorse::{run, RunOptions, TaskError};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let calls = Arc::new(AtomicUsize::new(0));

    let strategy = Sequential::new(Duration::from_secs(1))
        .with(OneShot::new(10))
        .with(OneShot::new(20))
        .with(OneShot::new(15))
        .with(OneShot::new(25))
        .with(OneShot::new(30));

    let summary = run(
        move || {
            let index = calls.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                match index {
                    i if i % 3 == 0 => Err(TaskError::new("argument", "bad argument")),
                    i if i % 5 == 0 => {
                        Err(TaskError::new("invalid-operation", "invalid operation"))
                    }
                    _ => {
                        tokio::time::sleep(Duration::from_millis(1100)).await;
                        Ok(())
                    }
                }
            }
        },
        RunOptions::builder()
            .name("console-demo")
            .strategy(Box::new(strategy))
            .build(),
    )
    .expect("load test failed");

    print!("{summary}");
}
