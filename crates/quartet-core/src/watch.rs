//! Watch supervisor.
//!
//! One long-lived watcher per matrix step. Recoverable errors are logged and
//! the watcher keeps going. The first fatal event from any watcher settles the
//! supervisor with an error; without one it never returns.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use quartet_config::{BuildPlan, BuildStep};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::capability::{BundlingEngine, WatchOptions, WatchStream};
use crate::error::{EngineError, Error, Result};

/// Event emitted by a watcher.
#[derive(Debug)]
pub enum WatchEvent {
    /// A rebuild cycle is starting.
    Start,
    /// The bundle for this watcher's output is being built.
    BundleStart,
    /// The bundle finished successfully.
    BundleEnd { duration: Duration },
    /// The rebuild cycle finished.
    End,
    /// A rebuild failed; the watcher keeps running.
    Error(EngineError),
    /// The watcher cannot continue.
    Fatal(EngineError),
}

impl WatchEvent {
    pub fn is_fatal(&self) -> bool {
        matches!(self, WatchEvent::Fatal(_))
    }
}

/// Runs one watcher per step and settles on the first fatal event.
pub struct WatchSupervisor<E> {
    engine: Arc<E>,
    plan: BuildPlan,
    options: WatchOptions,
}

impl<E: BundlingEngine> WatchSupervisor<E> {
    pub fn new(engine: Arc<E>, plan: BuildPlan) -> Self {
        let options = WatchOptions::from_settings(plan.settings());
        Self {
            engine,
            plan,
            options,
        }
    }

    pub fn with_options(mut self, options: WatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Start every watcher and wait for the first fatal event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatchFatal`] for the first watcher that fails to start
    /// or reports a fatal event. Later fatal events are only logged.
    pub async fn watch(&self) -> Result<Infallible> {
        let steps = self.plan.steps();
        let (fatal_tx, mut fatal_rx) = mpsc::channel::<Error>(steps.len().max(1));

        for plan in steps {
            let step = plan.step;
            let events = Arc::clone(&self.engine)
                .watch(plan.input.clone(), plan.output.clone(), self.options.clone())
                .map_err(|source| {
                    tracing::error!(%step, error = %source, "failed to start watcher");
                    Error::WatchFatal { step, source }
                })?;

            tracing::debug!(%step, dir = %plan.output.dir.display(), "watcher started");
            tokio::spawn(dispatch(step, events, fatal_tx.clone()));
        }
        drop(fatal_tx);

        match fatal_rx.recv().await {
            Some(err) => Err(err),
            // Every watcher stream ended without a fatal event.
            None => std::future::pending().await,
        }
    }
}

/// Handle one watcher's events until it ends or reports a fatal event.
async fn dispatch(step: BuildStep, mut events: WatchStream, fatal: mpsc::Sender<Error>) {
    while let Some(event) = events.next().await {
        match event {
            WatchEvent::Fatal(source) => {
                tracing::error!(%step, error = %source, "watcher failed");
                // The supervisor may already have settled on another watcher.
                let _ = fatal.send(Error::WatchFatal { step, source }).await;
                return;
            }
            WatchEvent::Error(err) => {
                tracing::error!(%step, error = %err, "rebuild failed");
            }
            WatchEvent::BundleEnd { duration } => {
                tracing::info!(%step, "✓ built in {}ms", duration.as_millis());
            }
            other => {
                tracing::debug!(%step, event = ?other);
            }
        }
    }
    tracing::debug!(%step, "watcher stream ended");
}
