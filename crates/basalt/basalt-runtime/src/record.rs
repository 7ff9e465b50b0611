//! Capture of produced tokens, one stream per output port.
//!
//! Recorders exist so tests (and the demo binary) can observe exact token
//! histories without reaching into live channels. Only produced tokens are
//! observed; the recorder never sees what an actor consumed.

use basalt_graph::Actor;

struct RecordedOutput {
    /// `production · token_size` for the port — the slice of the produced
    /// region that belongs to it on every firing.
    bytes_per_firing: usize,
    bytes: Vec<u8>,
}

/// Append-only store of everything one actor produced.
///
/// Storage for each output is reserved up front for the whole run
/// (`max_firings · production · token_size` bytes), so recording on the hot
/// path is a bounds-checked copy and never reallocates.
pub struct Recorder {
    outputs: Vec<RecordedOutput>,
    firings_recorded: u64,
}

impl Recorder {
    pub(crate) fn new(actor: &Actor, max_firings: u64) -> Self {
        let outputs = actor
            .outputs
            .iter()
            .map(|output| {
                let bytes_per_firing = output.bytes_per_firing();
                RecordedOutput {
                    bytes_per_firing,
                    bytes: Vec::with_capacity(max_firings as usize * bytes_per_firing),
                }
            })
            .collect();
        Self {
            outputs,
            firings_recorded: 0,
        }
    }

    /// Appends one firing's produced region, split across the per-output
    /// streams in port order.
    pub(crate) fn append(&mut self, produced: &[u8]) {
        let mut offset = 0;
        for output in &mut self.outputs {
            output
                .bytes
                .extend_from_slice(&produced[offset..offset + output.bytes_per_firing]);
            offset += output.bytes_per_firing;
        }
        debug_assert_eq!(offset, produced.len());
        self.firings_recorded += 1;
    }

    /// Copies the recorded stream for one output port out of the recorder.
    /// The returned buffer is the caller's own; internal storage is never
    /// aliased.
    pub fn tokens(&self, output: usize) -> Vec<u8> {
        self.outputs[output].bytes.clone()
    }

    pub fn firings_recorded(&self) -> u64 {
        self.firings_recorded
    }
}
