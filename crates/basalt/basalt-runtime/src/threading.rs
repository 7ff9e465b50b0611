//! Host threading capability injected into the parallel scheduler.

use crate::error::ThreadingError;
use std::time::Duration;

/// What the parallel scheduler needs from its host: spawn, join, and a
/// back-off sleep. Injecting this keeps the runtime itself host-agnostic —
/// tests and embedders can substitute their own thread source.
///
/// The capability is cloned into every worker (for the back-off sleep), so
/// implementations should be cheap handles, not resource owners.
pub trait Threading: Clone + Send + 'static {
    /// Whatever the host needs to join the thread later.
    type Handle;

    fn spawn<F>(&self, task: F) -> Result<Self::Handle, ThreadingError>
    where
        F: FnOnce() + Send + 'static;

    fn join(&self, handle: Self::Handle) -> Result<(), ThreadingError>;

    /// Blocks the calling worker between failed fire attempts.
    fn sleep(&self, interval: Duration);

    /// How long a worker backs off when its actor cannot fire.
    fn poll_interval(&self) -> Duration;
}

/// OS-thread capability over `std::thread`.
#[derive(Clone, Copy, Debug)]
pub struct StdThreading {
    pub poll_interval: Duration,
}

impl Default for StdThreading {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_micros(100),
        }
    }
}

impl Threading for StdThreading {
    type Handle = std::thread::JoinHandle<()>;

    fn spawn<F>(&self, task: F) -> Result<Self::Handle, ThreadingError>
    where
        F: FnOnce() + Send + 'static,
    {
        std::thread::Builder::new()
            .spawn(task)
            .map_err(|source| ThreadingError::Spawn { source })
    }

    fn join(&self, handle: Self::Handle) -> Result<(), ThreadingError> {
        handle.join().map_err(|_| ThreadingError::Join)
    }

    fn sleep(&self, interval: Duration) {
        std::thread::sleep(interval);
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
