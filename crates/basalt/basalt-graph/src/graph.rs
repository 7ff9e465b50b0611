#![forbid(unsafe_code)]

use crate::port::{InputPort, InputRef, OutputPort, OutputRef};

/// An actor's execution function: a pure map from the consumed-tokens byte
/// region to the produced-tokens byte region.
///
/// Both regions are concatenations in port order, each port contributing
/// `rate × token_size` bytes. The function must be deterministic, keep no
/// state, and never block; a bare `fn` pointer keeps [`Graph`] `Send + Sync`
/// so the parallel scheduler can share it across workers without boxing.
pub type Execution = fn(consumed: &[u8], produced: &mut [u8]);

/// A stateless computational node: ordered input ports, ordered output ports,
/// and the execution function fired over them.
#[derive(Clone, Debug)]
pub struct Actor {
    pub execution: Execution,
    pub inputs: Vec<InputPort>,
    pub outputs: Vec<OutputPort>,
}

impl Actor {
    /// Total bytes consumed by one firing, over all input ports.
    pub fn consumed_bytes(&self) -> usize {
        self.inputs.iter().map(InputPort::bytes_per_firing).sum()
    }

    /// Total bytes produced by one firing, over all output ports.
    pub fn produced_bytes(&self) -> usize {
        self.outputs.iter().map(OutputPort::bytes_per_firing).sum()
    }
}

/// The static declaration of a channel: where it comes from, where it goes,
/// and the tokens it starts with.
///
/// `initial_tokens` is a byte blob holding `k` whole tokens; a non-empty blob
/// is what lets feedback cycles get off the ground. Multiple connections may
/// share one source port (fan-out, each gets every produced token); an input
/// port is the destination of exactly one connection.
#[derive(Clone, Debug)]
pub struct Connection {
    pub source: OutputRef,
    pub destination: InputRef,
    pub token_size: usize,
    pub initial_tokens: Vec<u8>,
}

impl Connection {
    /// Number of whole tokens in the initial blob.
    pub fn initial_token_count(&self) -> usize {
        debug_assert!(
            self.initial_tokens.len() % self.token_size == 0,
            "initial token blob is not a whole number of tokens"
        );
        self.initial_tokens.len() / self.token_size
    }
}

/// An ordered list of actors plus an ordered list of connections.
/// Read-only across every run; actor identity is list position.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub actors: Vec<Actor>,
    pub connections: Vec<Connection>,
}

impl Graph {
    /// The output port a connection originates from.
    pub fn source_port(&self, connection: &Connection) -> &OutputPort {
        &self.actors[connection.source.actor].outputs[connection.source.port]
    }

    /// The input port a connection terminates at.
    pub fn destination_port(&self, connection: &Connection) -> &InputPort {
        &self.actors[connection.destination.actor].inputs[connection.destination.port]
    }
}
