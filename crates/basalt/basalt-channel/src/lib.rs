//! `basalt-channel`: bounded token FIFOs connecting dataflow actors.
//!
//! A channel moves fixed-size byte tokens from exactly one producing port to
//! exactly one consuming port. Two implementations share the [`TokenFifo`]
//! contract:
//!
//! - [`SequentialChannel`]: plain cursors, no synchronization. It is not
//!   `Sync`, so the type system confines it to the single-threaded scheduler.
//! - [`SpscChannel`]: atomic cursors with acquire/release publication. This
//!   is the only cross-thread synchronization primitive of the parallel
//!   scheduler — one producer thread, one consumer thread, no locks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   push (producer side)   ┌─────────────┐   pop (consumer side)   ┌──────────┐
//! │ producer │ ───────────────────────▶ │ ring buffer │ ──────────────────────▶ │ consumer │
//! │  actor   │                          │  (1 slot    │                         │  actor   │
//! └──────────┘                          │  reserved)  │                         └──────────┘
//!                                       └─────────────┘
//! ```
//!
//! Fan-out is modeled by giving a source port several independent channels,
//! never by sharing one channel between consumers.
//!
//! # Internal Modules
//!
//! - `fifo`: the shared contract, the overflow error, and the capacity rule
//! - `sequential`: unsynchronized single-threaded ring
//! - `spsc`: lock-free single-producer/single-consumer ring

mod fifo;
mod sequential;
mod spsc;

pub use fifo::{ChannelOverflow, TokenFifo, required_capacity};
pub use sequential::SequentialChannel;
pub use spsc::SpscChannel;
