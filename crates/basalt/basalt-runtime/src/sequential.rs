//! Single-threaded scheduler: fire any enabled actor until each iteration's
//! budget is spent.

use crate::error::RuntimeError;
use crate::run::SequentialRun;
use tracing::{debug, warn};

impl SequentialRun {
    /// Executes exactly `num_iterations` iterations.
    ///
    /// Each iteration copies the repetition vector into a `remaining` budget
    /// and repeatedly fires the lowest-indexed enabled actor, restarting the
    /// scan after every firing. The ascending-index tie-break is part of the
    /// observable contract: with deterministic actors it fixes the exact
    /// token history every recorder sees.
    ///
    /// An iteration that stalls with budget left is a deadlock (inconsistent
    /// or under-seeded graph) and aborts the run.
    pub fn execute(&mut self) -> Result<(), RuntimeError> {
        for _ in 0..self.num_iterations {
            self.iterate()?;
        }
        debug!(iterations = self.num_iterations, "sequential run completed");
        Ok(())
    }

    fn iterate(&mut self) -> Result<(), RuntimeError> {
        let mut remaining = self.repetitions.clone();
        loop {
            let enabled = (0..self.actor_runs.len())
                .find(|&actor| remaining[actor] > 0 && self.actor_runs[actor].can_fire(&self.channels));
            let Some(actor) = enabled else {
                break;
            };
            self.actor_runs[actor].fire(&self.channels)?;
            remaining[actor] -= 1;
        }
        if remaining.iter().all(|&budget| budget == 0) {
            Ok(())
        } else {
            warn!(?remaining, "iteration stalled before every actor met its quota");
            Err(RuntimeError::SchedulingDeadlock)
        }
    }
}
