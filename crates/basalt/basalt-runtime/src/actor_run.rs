//! Per-actor execution state and the can-fire / fire protocol.

use crate::record::Recorder;
use basalt_channel::{ChannelOverflow, TokenFifo};
use basalt_graph::Graph;
use std::sync::Arc;

/// Everything one actor needs to fire: scratch buffers for a single firing,
/// channel bindings, the firing budget, and an optional recorder.
///
/// Bindings are indices into the owning run's channel array — input ports
/// bind exactly one channel, output ports bind a list (fan-out: every bound
/// channel receives every produced token). The run state itself holds no
/// channel storage, so it can move onto a worker thread while the channels
/// stay shared.
pub struct ActorRun {
    graph: Arc<Graph>,
    actor_id: usize,
    /// Consumed-tokens region of one firing, ports concatenated in order.
    consumed: Vec<u8>,
    /// Produced-tokens region of one firing, ports concatenated in order.
    produced: Vec<u8>,
    input_channels: Vec<usize>,
    output_channels: Vec<Vec<usize>>,
    recorder: Option<Recorder>,
    fire_count: u64,
    max_fire_count: u64,
}

impl ActorRun {
    pub(crate) fn new(
        graph: Arc<Graph>,
        actor_id: usize,
        input_channels: Vec<usize>,
        output_channels: Vec<Vec<usize>>,
        recorder: Option<Recorder>,
        max_fire_count: u64,
    ) -> Self {
        let actor = &graph.actors[actor_id];
        let consumed = vec![0u8; actor.consumed_bytes()];
        let produced = vec![0u8; actor.produced_bytes()];
        Self {
            graph,
            actor_id,
            consumed,
            produced,
            input_channels,
            output_channels,
            recorder,
            fire_count: 0,
            max_fire_count,
        }
    }

    /// True iff the firing budget has room and every input channel holds at
    /// least one firing's worth of tokens. No side effects.
    pub fn can_fire<C: TokenFifo>(&self, channels: &[C]) -> bool {
        if self.fire_count >= self.max_fire_count {
            return false;
        }
        let actor = &self.graph.actors[self.actor_id];
        actor
            .inputs
            .iter()
            .zip(&self.input_channels)
            .all(|(port, &channel_id)| channels[channel_id].occupancy() >= port.consumption)
    }

    /// One atomic firing: consume, execute, produce, record, count.
    ///
    /// Precondition: [`Self::can_fire`] returned true in the same logical
    /// step. In the parallel scheduler no further synchronization is needed
    /// between the test and the consume — this actor is the only consumer of
    /// each of its input channels, so observed occupancy cannot shrink.
    pub fn fire<C: TokenFifo>(&mut self, channels: &[C]) -> Result<(), ChannelOverflow> {
        let actor = &self.graph.actors[self.actor_id];

        // Consume: pop each input port's tokens into the contiguous region.
        let mut offset = 0;
        for (port, &channel_id) in actor.inputs.iter().zip(&self.input_channels) {
            let channel = &channels[channel_id];
            for _ in 0..port.consumption {
                channel.pop(&mut self.consumed[offset..offset + port.token_size]);
                offset += port.token_size;
            }
        }

        (actor.execution)(&self.consumed, &mut self.produced);

        // Produce: every fan-out channel of a port receives the port's full
        // production sequence, starting at the same offset.
        let mut offset = 0;
        for (port, fan_out) in actor.outputs.iter().zip(&self.output_channels) {
            let port_bytes = port.bytes_per_firing();
            let produced_by_port = &self.produced[offset..offset + port_bytes];
            for &channel_id in fan_out {
                let channel = &channels[channel_id];
                for token in produced_by_port.chunks_exact(port.token_size) {
                    channel.push(token)?;
                }
            }
            offset += port_bytes;
        }

        if let Some(recorder) = &mut self.recorder {
            recorder.append(&self.produced);
        }

        self.fire_count += 1;
        Ok(())
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    pub fn max_fire_count(&self) -> u64 {
        self.max_fire_count
    }

    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }
}
