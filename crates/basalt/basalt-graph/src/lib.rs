//! Static dataflow graph vocabulary shared by every basalt crate.
//!
//! A graph is a read-only value built once by the caller: actors with fixed
//! per-port token rates, and connections that carry typed-size tokens between
//! an output port and an input port. Execution state (channels, scratch
//! buffers, recorders) lives elsewhere; nothing in this crate is mutated
//! after construction.

pub mod graph;
pub mod port;

pub use graph::{Actor, Connection, Execution, Graph};
pub use port::{InputPort, InputRef, OutputPort, OutputRef};
