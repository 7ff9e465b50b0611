//! Run construction: sizing, prefill, and wiring.

use crate::actor_run::ActorRun;
use crate::error::RuntimeError;
use crate::record::Recorder;
use crate::repetition::repetition_vector;
use basalt_channel::{SequentialChannel, SpscChannel, TokenFifo, required_capacity};
use basalt_graph::Graph;
use std::sync::Arc;
use tracing::debug;

/// One execution of a graph: the channels, the per-actor run states, and the
/// firing budgets for `num_iterations` iterations.
///
/// The graph itself stays outside, shared through an `Arc` and never written;
/// the run owns everything mutable. `C` selects the channel variant and with
/// it the scheduler family the run supports.
pub struct GraphRun<C: TokenFifo> {
    pub(crate) graph: Arc<Graph>,
    pub(crate) repetitions: Vec<u64>,
    pub(crate) num_iterations: u64,
    pub(crate) channels: Vec<C>,
    pub(crate) actor_runs: Vec<ActorRun>,
}

/// Run driven by the single-threaded scheduler.
pub type SequentialRun = GraphRun<SequentialChannel>;

/// Run driven by the worker-per-actor scheduler.
pub type ParallelRun = GraphRun<SpscChannel>;

impl<C: TokenFifo> GraphRun<C> {
    /// Builds a run with a recorder on every actor.
    pub fn new(graph: Arc<Graph>, num_iterations: u64) -> Result<Self, RuntimeError> {
        Self::build(graph, num_iterations, true)
    }

    /// Builds a run that records nothing — for measurement runs where
    /// recorder memory (`num_iterations · q[a]` firings per actor) is waste.
    pub fn new_unrecorded(graph: Arc<Graph>, num_iterations: u64) -> Result<Self, RuntimeError> {
        Self::build(graph, num_iterations, false)
    }

    fn build(graph: Arc<Graph>, num_iterations: u64, record: bool) -> Result<Self, RuntimeError> {
        let repetitions = repetition_vector(&graph)?;

        // One channel per connection, sized so the producer can run a full
        // iteration ahead, prefilled with the connection's initial tokens.
        let mut channels = Vec::with_capacity(graph.connections.len());
        for (connection_id, connection) in graph.connections.iter().enumerate() {
            let source = graph.source_port(connection);
            let destination = graph.destination_port(connection);
            assert!(
                connection.token_size == source.token_size
                    && connection.token_size == destination.token_size,
                "connection {connection_id}: token size disagrees with its endpoint ports"
            );
            let capacity = required_capacity(
                connection.initial_token_count(),
                repetitions[connection.source.actor],
                source.production,
            );
            let channel = C::with_capacity(connection.token_size, capacity);
            for token in connection.initial_tokens.chunks_exact(connection.token_size) {
                channel
                    .push(token)
                    .expect("capacity rule reserves room for every initial token");
            }
            channels.push(channel);
        }

        // Wire bindings by scanning connections per actor: one inbound
        // channel per input port, a fan-out list per output port.
        let mut actor_runs = Vec::with_capacity(graph.actors.len());
        for (actor_id, actor) in graph.actors.iter().enumerate() {
            let mut input_channels: Vec<Option<usize>> = vec![None; actor.inputs.len()];
            let mut output_channels: Vec<Vec<usize>> = vec![Vec::new(); actor.outputs.len()];
            for (channel_id, connection) in graph.connections.iter().enumerate() {
                if connection.destination.actor == actor_id {
                    let slot = &mut input_channels[connection.destination.port];
                    assert!(
                        slot.is_none(),
                        "input port {actor_id}.{} has more than one inbound connection",
                        connection.destination.port
                    );
                    *slot = Some(channel_id);
                }
                if connection.source.actor == actor_id {
                    output_channels[connection.source.port].push(channel_id);
                }
            }
            let input_channels = input_channels
                .into_iter()
                .enumerate()
                .map(|(port, channel)| {
                    channel.unwrap_or_else(|| {
                        panic!("input port {actor_id}.{port} has no inbound connection")
                    })
                })
                .collect();

            let max_fire_count = num_iterations
                .checked_mul(repetitions[actor_id])
                .ok_or(RuntimeError::GraphTooLarge)?;
            let recorder = record.then(|| Recorder::new(actor, max_fire_count));
            actor_runs.push(ActorRun::new(
                Arc::clone(&graph),
                actor_id,
                input_channels,
                output_channels,
                recorder,
                max_fire_count,
            ));
        }

        debug!(
            actors = graph.actors.len(),
            channels = channels.len(),
            iterations = num_iterations,
            repetitions = ?repetitions,
            "graph run constructed"
        );

        Ok(Self {
            graph,
            repetitions,
            num_iterations,
            channels,
            actor_runs,
        })
    }

    /// The graph this run executes.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The solved repetition vector, one entry per actor.
    pub fn repetitions(&self) -> &[u64] {
        &self.repetitions
    }

    pub fn num_iterations(&self) -> u64 {
        self.num_iterations
    }

    /// How many times an actor has fired so far.
    pub fn fire_count(&self, actor: usize) -> u64 {
        self.actor_runs[actor].fire_count()
    }

    /// Current token count of the channel built for connection `connection`.
    pub fn occupancy(&self, connection: usize) -> usize {
        self.channels[connection].occupancy()
    }

    /// Copies out the tokens recorded for one output port of one actor.
    /// Empty for runs built with [`Self::new_unrecorded`].
    pub fn recorded_tokens(&self, actor: usize, output: usize) -> Vec<u8> {
        match self.actor_runs[actor].recorder() {
            Some(recorder) => recorder.tokens(output),
            None => Vec::new(),
        }
    }
}
