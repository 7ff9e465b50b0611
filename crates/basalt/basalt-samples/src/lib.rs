//! Statically-defined sample graphs for tests, benches, and the demo binary.
//!
//! Three fixtures of increasing trickiness:
//!
//! - [`simple`]: constant → gain → sink over f64 tokens, all rates 1
//! - [`larger`]: two actors in a four-connection multirate cycle, kept live
//!   by initial tokens on the feedback connections
//! - [`feedback`]: a single actor circulating one seed token through a
//!   self-loop

pub mod tokens;

pub use tokens::{as_f64s, as_i32s, as_u8s, f64_tokens, i32_tokens};

use basalt_graph::{Actor, Connection, Graph, InputPort, InputRef, OutputPort, OutputRef};
use tokens::{write_f64s, write_i32s};

const F64: usize = size_of::<f64>();
const I32: usize = size_of::<i32>();

fn constant_execute(_consumed: &[u8], produced: &mut [u8]) {
    produced.copy_from_slice(&3.0f64.to_ne_bytes());
}

fn gain_execute(consumed: &[u8], produced: &mut [u8]) {
    let input = f64::from_ne_bytes(consumed.try_into().unwrap());
    produced.copy_from_slice(&(input * 2.0).to_ne_bytes());
}

fn sink_execute(_consumed: &[u8], _produced: &mut [u8]) {}

/// Constant(3.0) → ×2 gain → sink. Repetition vector [1, 1, 1].
pub fn simple() -> Graph {
    let f64_input = InputPort {
        token_size: F64,
        consumption: 1,
    };
    let f64_output = OutputPort {
        token_size: F64,
        production: 1,
    };
    Graph {
        actors: vec![
            Actor {
                execution: constant_execute,
                inputs: vec![],
                outputs: vec![f64_output],
            },
            Actor {
                execution: gain_execute,
                inputs: vec![f64_input],
                outputs: vec![f64_output],
            },
            Actor {
                execution: sink_execute,
                inputs: vec![f64_input],
                outputs: vec![],
            },
        ],
        connections: vec![
            Connection {
                source: OutputRef { actor: 0, port: 0 },
                destination: InputRef { actor: 1, port: 0 },
                token_size: F64,
                initial_tokens: Vec::new(),
            },
            Connection {
                source: OutputRef { actor: 1, port: 0 },
                destination: InputRef { actor: 2, port: 0 },
                token_size: F64,
                initial_tokens: Vec::new(),
            },
        ],
    }
}

// Left actor: consumes (int ×2, char ×3), produces (double ×5, int ×7).
// Int output spreads input 0 then input 1; double output promotes the three
// chars as [c0, c1, c2, c2, c2].
fn left_execute(consumed: &[u8], produced: &mut [u8]) {
    let ints = tokens::as_i32s(&consumed[..2 * I32]);
    let chars = &consumed[2 * I32..2 * I32 + 3];

    let mut doubles = [0f64; 5];
    doubles[0] = chars[0] as f64;
    doubles[1] = chars[1] as f64;
    for slot in 2..5 {
        doubles[slot] = chars[2] as f64;
    }

    let mut int_out = [0i32; 7];
    int_out[0] = ints[0];
    for slot in 1..7 {
        int_out[slot] = ints[1];
    }

    write_f64s(&mut produced[..5 * F64], &doubles);
    write_i32s(&mut produced[5 * F64..], &int_out);
}

// Right actor: consumes (int ×14, double ×10), produces (char ×6, int ×4).
// Chars narrow doubles 0..3 and 5..8; ints pick inputs 0, 1, 7, 8.
fn right_execute(consumed: &[u8], produced: &mut [u8]) {
    let ints = tokens::as_i32s(&consumed[..14 * I32]);
    let doubles = tokens::as_f64s(&consumed[14 * I32..]);

    for slot in 0..3 {
        produced[slot] = doubles[slot] as u8;
        produced[slot + 3] = doubles[slot + 5] as u8;
    }
    write_i32s(
        &mut produced[6..],
        &[ints[0], ints[1], ints[7], ints[8]],
    );
}

/// Two actors exchanging int, char and double streams around a cycle.
/// Repetition vector [2, 1]; the right→left connections carry the initial
/// tokens ({2, 3, 5, 7} as ints, 'a'..'f' as chars) that break the deadlock.
pub fn larger() -> Graph {
    Graph {
        actors: vec![
            Actor {
                execution: left_execute,
                inputs: vec![
                    InputPort {
                        token_size: I32,
                        consumption: 2,
                    },
                    InputPort {
                        token_size: 1,
                        consumption: 3,
                    },
                ],
                outputs: vec![
                    OutputPort {
                        token_size: F64,
                        production: 5,
                    },
                    OutputPort {
                        token_size: I32,
                        production: 7,
                    },
                ],
            },
            Actor {
                execution: right_execute,
                inputs: vec![
                    InputPort {
                        token_size: I32,
                        consumption: 14,
                    },
                    InputPort {
                        token_size: F64,
                        consumption: 10,
                    },
                ],
                outputs: vec![
                    OutputPort {
                        token_size: 1,
                        production: 6,
                    },
                    OutputPort {
                        token_size: I32,
                        production: 4,
                    },
                ],
            },
        ],
        connections: vec![
            Connection {
                source: OutputRef { actor: 0, port: 0 },
                destination: InputRef { actor: 1, port: 1 },
                token_size: F64,
                initial_tokens: Vec::new(),
            },
            Connection {
                source: OutputRef { actor: 0, port: 1 },
                destination: InputRef { actor: 1, port: 0 },
                token_size: I32,
                initial_tokens: Vec::new(),
            },
            Connection {
                source: OutputRef { actor: 1, port: 0 },
                destination: InputRef { actor: 0, port: 1 },
                token_size: 1,
                initial_tokens: b"abcdef".to_vec(),
            },
            Connection {
                source: OutputRef { actor: 1, port: 1 },
                destination: InputRef { actor: 0, port: 0 },
                token_size: I32,
                initial_tokens: i32_tokens(&[2, 3, 5, 7]),
            },
        ],
    }
}

fn identity_execute(consumed: &[u8], produced: &mut [u8]) {
    produced.copy_from_slice(consumed);
}

/// One identity actor on a self-loop seeded with the int token 42.
/// Repetition vector [1]; the seed circulates forever.
pub fn feedback() -> Graph {
    Graph {
        actors: vec![Actor {
            execution: identity_execute,
            inputs: vec![InputPort {
                token_size: I32,
                consumption: 1,
            }],
            outputs: vec![OutputPort {
                token_size: I32,
                production: 1,
            }],
        }],
        connections: vec![Connection {
            source: OutputRef { actor: 0, port: 0 },
            destination: InputRef { actor: 0, port: 0 },
            token_size: I32,
            initial_tokens: i32_tokens(&[42]),
        }],
    }
}
