use basalt_channel::ChannelOverflow;
use thiserror::Error;

/// Everything a run can fail with. The set is closed: internal code paths
/// propagate these outward instead of attempting local recovery, and a
/// failed `GraphRun` constructor leaves nothing allocated behind.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The balance equations have no positive integer solution.
    #[error("graph is inconsistent: no positive repetition vector exists")]
    InconsistentGraph,

    /// Rate products overflowed while solving the balance equations.
    #[error("graph rates overflow the repetition-vector solver")]
    GraphTooLarge,

    /// A channel sized by the capacity rule still filled up — a constructor
    /// bug, not a runtime condition; the run must be abandoned.
    #[error(transparent)]
    ChannelOverflow(#[from] ChannelOverflow),

    /// A sequential iteration stalled before every actor met its quota.
    #[error("sequential iteration deadlocked with unfired actors remaining")]
    SchedulingDeadlock,

    /// The host threading capability failed to create or join a worker.
    #[error(transparent)]
    Threading(#[from] ThreadingError),
}

/// Failure inside the injected threading capability.
#[derive(Debug, Error)]
pub enum ThreadingError {
    #[error("failed to spawn worker thread")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    #[error("worker thread failed to join")]
    Join,
}
