//! `basalt-runtime`: executing static dataflow graphs.
//!
//! A [`basalt_graph::Graph`] says what to compute; this crate computes it.
//! Construction solves the balance equations for the minimal firing vector,
//! sizes one channel per connection, and wires per-actor run state. Two
//! schedulers drive the result:
//!
//! - [`SequentialRun::execute`]: single-threaded, deterministic actor order
//! - [`ParallelRun::execute`]: one worker per actor over lock-free SPSC
//!   channels, with the thread source injected through [`Threading`]
//!
//! ```ignore
//! use basalt_runtime::SequentialRun;
//! use std::sync::Arc;
//!
//! let graph = Arc::new(build_graph());
//! let mut run = SequentialRun::new(graph, 100)?;
//! run.execute()?;
//! let history = run.recorded_tokens(1, 0);
//! ```
//!
//! Recorded token histories of both schedulers are identical channel by
//! channel; only the interleaving across channels differs.

mod actor_run;
mod error;
mod parallel;
mod record;
mod repetition;
mod run;
mod sequential;
mod threading;

pub use actor_run::ActorRun;
pub use error::{RuntimeError, ThreadingError};
pub use record::Recorder;
pub use repetition::repetition_vector;
pub use run::{GraphRun, ParallelRun, SequentialRun};
pub use threading::{StdThreading, Threading};
