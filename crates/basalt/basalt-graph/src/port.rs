#![forbid(unsafe_code)]

// Ports are plain data: a token byte size plus a rate in tokens per firing.
// Rates are fixed for the lifetime of the graph (SDF semantics).

/// Consuming side of a connection. `consumption` tokens of `token_size` bytes
/// are removed from the bound channel on every firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputPort {
    pub token_size: usize,
    pub consumption: usize,
}

/// Producing side of a connection. `production` tokens of `token_size` bytes
/// are appended to every bound channel on each firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPort {
    pub token_size: usize,
    pub production: usize,
}

/// Names an output port by position: actor index, then port index within the
/// actor's output list. Actor identity is its index in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputRef {
    pub actor: usize,
    pub port: usize,
}

/// Names an input port by position, mirroring [`OutputRef`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRef {
    pub actor: usize,
    pub port: usize,
}

impl InputPort {
    /// Bytes this port contributes to the consumed region of one firing.
    #[inline]
    pub fn bytes_per_firing(&self) -> usize {
        self.consumption * self.token_size
    }
}

impl OutputPort {
    /// Bytes this port contributes to the produced region of one firing.
    #[inline]
    pub fn bytes_per_firing(&self) -> usize {
        self.production * self.token_size
    }
}
