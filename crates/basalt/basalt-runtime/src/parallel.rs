//! Worker-per-actor scheduler over SPSC channels.
//!
//! Every actor gets its own worker thread running the same loop: poll
//! `can_fire` with a back-off sleep, fire, repeat until the firing budget is
//! spent. The SPSC channels are the only synchronization on the data path —
//! each channel has exactly one producing and one consuming worker, and the
//! capacity rule guarantees a producer is never stuck more than one full
//! iteration ahead of its consumer, so every worker's budget is reachable.

use crate::actor_run::ActorRun;
use crate::error::RuntimeError;
use crate::run::ParallelRun;
use crate::threading::Threading;
use basalt_channel::{ChannelOverflow, SpscChannel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use tracing::{debug, warn};

impl ParallelRun {
    /// Executes the run with one worker per actor on the given capability.
    ///
    /// Workers are created in actor order and joined in actor order. After a
    /// successful run the actor states (and with them the recorders) are back
    /// in place for observation; channels and recorders are torn down
    /// strictly after every worker has joined.
    ///
    /// On a spawn or join failure the surviving workers are stopped through
    /// the abort flag, joined best-effort, and the capability's error is
    /// surfaced.
    pub fn execute<T: Threading>(&mut self, threading: &T) -> Result<(), RuntimeError> {
        if self.actor_runs.is_empty() {
            return Ok(());
        }

        let channels = Arc::new(std::mem::take(&mut self.channels));
        let actor_runs = std::mem::take(&mut self.actor_runs);
        let num_workers = actor_runs.len();
        // Raised on any failure so stalled workers stop polling instead of
        // waiting for tokens that will never arrive.
        let abort = Arc::new(AtomicBool::new(false));
        // Workers own their actor state while running and hand it back here,
        // keeping recorders observable after the join.
        let (finished_tx, finished_rx) = mpsc::channel();

        debug!(workers = num_workers, "spawning parallel workers");

        let mut handles = Vec::with_capacity(num_workers);
        let mut spawn_error = None;
        for (actor_id, mut actor_run) in actor_runs.into_iter().enumerate() {
            let channels = Arc::clone(&channels);
            let abort = Arc::clone(&abort);
            let finished = finished_tx.clone();
            let worker_threading = threading.clone();
            let abort_for_spawn_error = Arc::clone(&abort);
            let spawned = threading.spawn(move || {
                let result = worker_loop(&mut actor_run, &channels, &worker_threading, &abort);
                let _ = finished.send((actor_id, actor_run, result));
            });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    warn!(actor = actor_id, "worker spawn failed, aborting run");
                    abort_for_spawn_error.store(true, Ordering::Relaxed);
                    spawn_error = Some(error);
                    break;
                }
            }
        }
        drop(finished_tx);

        let mut join_error = None;
        for handle in handles {
            if let Err(error) = threading.join(handle) {
                join_error = Some(error);
            }
        }

        // Reassemble whatever came back, in actor order, so recorders stay
        // reachable even after a partial run.
        let mut finished: Vec<_> = finished_rx.try_iter().collect();
        finished.sort_by_key(|(actor_id, ..)| *actor_id);
        let mut fire_error = None;
        self.actor_runs = finished
            .into_iter()
            .map(|(_, actor_run, result)| {
                if let Err(overflow) = result {
                    fire_error = Some(overflow);
                }
                actor_run
            })
            .collect();
        // Every worker clone is gone once the joins are done; a failed join
        // may leak the channels, but that run is already being abandoned.
        self.channels = Arc::try_unwrap(channels).unwrap_or_default();

        if let Some(error) = spawn_error {
            return Err(error.into());
        }
        if let Some(error) = join_error {
            return Err(error.into());
        }
        if let Some(overflow) = fire_error {
            return Err(overflow.into());
        }
        debug!(workers = num_workers, "parallel run completed");
        Ok(())
    }
}

fn worker_loop<T: Threading>(
    actor_run: &mut ActorRun,
    channels: &[SpscChannel],
    threading: &T,
    abort: &AtomicBool,
) -> Result<(), ChannelOverflow> {
    let interval = threading.poll_interval();
    while actor_run.fire_count() < actor_run.max_fire_count() {
        if actor_run.can_fire(channels) {
            if let Err(overflow) = actor_run.fire(channels) {
                // Mis-sized channel: stop the whole run, not just this actor,
                // or its peers would poll forever.
                abort.store(true, Ordering::Relaxed);
                return Err(overflow);
            }
        } else {
            if abort.load(Ordering::Relaxed) {
                return Ok(());
            }
            threading.sleep(interval);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::StdThreading;
    use basalt_samples::{as_f64s, as_i32s, feedback, simple};
    use std::sync::Arc;
    use std::time::Duration;

    fn quick_polling() -> StdThreading {
        StdThreading {
            poll_interval: Duration::from_micros(10),
        }
    }

    #[test]
    fn simple_parallel_run_records_full_histories() {
        let mut run = ParallelRun::new(Arc::new(simple()), 100).unwrap();
        run.execute(&quick_polling()).unwrap();
        assert_eq!(as_f64s(&run.recorded_tokens(0, 0)), vec![3.0; 100]);
        assert_eq!(as_f64s(&run.recorded_tokens(1, 0)), vec![6.0; 100]);
        for actor in 0..3 {
            assert_eq!(run.fire_count(actor), 100);
        }
        for connection in 0..2 {
            assert_eq!(run.occupancy(connection), 0);
        }
    }

    #[test]
    fn feedback_loop_runs_in_parallel() {
        let mut run = ParallelRun::new(Arc::new(feedback()), 50).unwrap();
        run.execute(&quick_polling()).unwrap();
        assert_eq!(as_i32s(&run.recorded_tokens(0, 0)), vec![42; 50]);
        assert_eq!(run.occupancy(0), 1);
    }

    #[test]
    fn zero_actor_graph_is_a_no_op() {
        let mut run = ParallelRun::new(Arc::new(basalt_graph::Graph::default()), 10).unwrap();
        run.execute(&StdThreading::default()).unwrap();
    }

    /// Capability whose spawn fails after the first worker: the run must
    /// surface `ThreadingError` and still terminate (the abort flag keeps
    /// the surviving worker from polling forever).
    #[derive(Clone)]
    struct FailingSecondSpawn {
        inner: StdThreading,
        spawned: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl Threading for FailingSecondSpawn {
        type Handle = std::thread::JoinHandle<()>;

        fn spawn<F>(&self, task: F) -> Result<Self::Handle, crate::ThreadingError>
        where
            F: FnOnce() + Send + 'static,
        {
            if self.spawned.fetch_add(1, Ordering::Relaxed) >= 1 {
                return Err(crate::ThreadingError::Spawn {
                    source: std::io::Error::other("thread limit reached"),
                });
            }
            self.inner.spawn(task)
        }

        fn join(&self, handle: Self::Handle) -> Result<(), crate::ThreadingError> {
            self.inner.join(handle)
        }

        fn sleep(&self, interval: Duration) {
            self.inner.sleep(interval);
        }

        fn poll_interval(&self) -> Duration {
            self.inner.poll_interval()
        }
    }

    #[test]
    fn spawn_failure_aborts_and_surfaces_threading_error() {
        let mut run = ParallelRun::new(Arc::new(simple()), 10).unwrap();
        let threading = FailingSecondSpawn {
            inner: quick_polling(),
            spawned: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        };
        let result = run.execute(&threading);
        assert!(matches!(
            result,
            Err(RuntimeError::Threading(crate::ThreadingError::Spawn { .. }))
        ));
    }
}
