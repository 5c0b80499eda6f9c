//! Force layout on a background thread, reporting over a channel.
//!
//! A [`ForceWorker`] owns at most one run. Starting another supersedes the previous one: its
//! thread exits at the next iteration boundary and its event stream ends without a terminal
//! event. [`ForceWorker::stop`] is cooperative and checked before each iteration, so a stopped
//! run reports [`WorkerEvent::Stopped`] with the positions of the last finished iteration.

use super::{ForceOptions, ForceSimulation};
use crate::error::{Error, Result};
use crate::graph::{Graph, PositionMap};
use futures::StreamExt;
use futures::channel::mpsc;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Iterations between two progress reports.
pub const PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Clone)]
pub struct ForceJob {
    pub graph: Graph,
    pub options: ForceOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Progress {
        /// Number of finished iterations.
        iteration: usize,
        /// Fraction in `[0, 1]`.
        progress: f64,
        positions: PositionMap,
    },
    Complete {
        positions: PositionMap,
    },
    Stopped {
        positions: PositionMap,
    },
    Error {
        message: String,
    },
}

pub type WorkerEvents = mpsc::UnboundedReceiver<WorkerEvent>;

#[derive(Debug)]
struct RunFlags {
    stop: AtomicBool,
    superseded: AtomicBool,
}

#[derive(Debug)]
struct RunHandle {
    flags: Arc<RunFlags>,
    thread: Option<JoinHandle<()>>,
}

impl RunHandle {
    fn supersede(self) {
        self.flags.superseded.store(true, Ordering::Release);
        self.flags.stop.store(true, Ordering::Release);
        // Detach; the thread exits on its own at the next iteration boundary.
        drop(self.thread);
    }
}

/// Context handed to a run body.
struct RunContext {
    flags: Arc<RunFlags>,
    tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl RunContext {
    fn should_stop(&self) -> bool {
        self.flags.stop.load(Ordering::Acquire)
    }

    fn is_superseded(&self) -> bool {
        self.flags.superseded.load(Ordering::Acquire)
    }

    fn emit(&self, event: WorkerEvent) {
        if self.is_superseded() {
            return;
        }
        // A dropped receiver only means nobody listens anymore.
        let _ = self.tx.unbounded_send(event);
    }
}

#[derive(Debug, Default)]
pub struct ForceWorker {
    active: Option<RunHandle>,
}

impl ForceWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run, superseding any run in flight.
    pub fn start(&mut self, job: ForceJob) -> WorkerEvents {
        self.spawn_run(move |ctx| run_job(job, ctx))
    }

    /// Requests cooperative cancellation of the current run.
    pub fn stop(&self) {
        if let Some(h) = &self.active {
            h.flags.stop.store(true, Ordering::Release);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .and_then(|h| h.thread.as_ref())
            .is_some_and(|t| !t.is_finished())
    }

    fn spawn_run<F>(&mut self, body: F) -> WorkerEvents
    where
        F: FnOnce(&RunContext) + Send + 'static,
    {
        if let Some(prev) = self.active.take() {
            tracing::debug!("superseding in-flight force layout");
            prev.supersede();
        }

        let (tx, rx) = mpsc::unbounded();
        let flags = Arc::new(RunFlags {
            stop: AtomicBool::new(false),
            superseded: AtomicBool::new(false),
        });
        let ctx = RunContext {
            flags: flags.clone(),
            tx: tx.clone(),
        };

        let spawned = std::thread::Builder::new()
            .name("narwhal-force".to_string())
            .spawn(move || {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| body(&ctx))) {
                    let message = panic_message(payload.as_ref());
                    tracing::debug!(%message, "force layout worker failed");
                    ctx.emit(WorkerEvent::Error { message });
                }
            });

        let thread = match spawned {
            Ok(t) => Some(t),
            Err(err) => {
                let _ = tx.unbounded_send(WorkerEvent::Error {
                    message: err.to_string(),
                });
                None
            }
        };
        self.active = Some(RunHandle { flags, thread });
        rx
    }
}

impl Drop for ForceWorker {
    fn drop(&mut self) {
        if let Some(h) = self.active.take() {
            h.supersede();
        }
    }
}

fn run_job(job: ForceJob, ctx: &RunContext) {
    let iterations = job.options.iterations;
    let mut sim = ForceSimulation::new(&job.graph, &job.options);
    tracing::debug!(nodes = sim.len(), iterations, "force layout worker started");

    for i in 0..iterations {
        if ctx.should_stop() {
            if !ctx.is_superseded() {
                tracing::debug!(iteration = i, "force layout worker stopped");
            }
            ctx.emit(WorkerEvent::Stopped {
                positions: sim.positions(),
            });
            return;
        }
        sim.step();
        let done = i + 1;
        if done % PROGRESS_INTERVAL == 0 || done == iterations {
            ctx.emit(WorkerEvent::Progress {
                iteration: done,
                progress: done as f64 / iterations as f64,
                positions: sim.positions(),
            });
        }
    }

    ctx.emit(WorkerEvent::Complete {
        positions: sim.positions(),
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "force layout worker panicked".to_string()
    }
}

/// Drains `events` until a terminal event and returns the final positions.
pub async fn finish(mut events: WorkerEvents) -> Result<PositionMap> {
    while let Some(event) = events.next().await {
        match event {
            WorkerEvent::Progress { .. } => {}
            WorkerEvent::Complete { positions } => return Ok(positions),
            WorkerEvent::Stopped { .. } => return Err(Error::WorkerStopped),
            WorkerEvent::Error { message } => return Err(Error::WorkerFailed { message }),
        }
    }
    Err(Error::WorkerTerminated)
}

#[cfg(test)]
mod tests {
    use super::{ForceWorker, WorkerEvent, finish};
    use crate::error::Error;
    use futures::executor::block_on;

    #[test]
    fn panicking_run_surfaces_message_verbatim() {
        let mut worker = ForceWorker::new();
        let events = worker.spawn_run(|_ctx| panic!("simulation exploded"));
        match block_on(finish(events)) {
            Err(Error::WorkerFailed { message }) => assert_eq!(message, "simulation exploded"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn run_that_sends_nothing_is_reported_as_terminated() {
        let mut worker = ForceWorker::new();
        let events = worker.spawn_run(|_ctx| {});
        assert!(matches!(block_on(finish(events)), Err(Error::WorkerTerminated)));
    }

    #[test]
    fn superseded_run_emits_nothing_more() {
        let mut worker = ForceWorker::new();
        let (go_tx, go_rx) = std::sync::mpsc::channel::<()>();
        let first = worker.spawn_run(move |ctx| {
            let _ = go_rx.recv();
            ctx.emit(WorkerEvent::Error {
                message: "late".to_string(),
            });
        });
        let second = worker.spawn_run(|ctx| {
            ctx.emit(WorkerEvent::Complete {
                positions: Default::default(),
            });
        });
        go_tx.send(()).expect("first run is waiting");
        assert!(matches!(block_on(finish(first)), Err(Error::WorkerTerminated)));
        assert!(block_on(finish(second)).expect("second run").is_empty());
    }
}
