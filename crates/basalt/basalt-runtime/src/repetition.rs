//! Balance-equation solver: the minimal positive firing vector.
//!
//! For every connection `production(src) · q[src] == consumption(dst) ·
//! q[dst]` must hold; one iteration (actor `a` fired `q[a]` times) then
//! returns every channel to its initial occupancy. Everything downstream —
//! channel sizing, firing budgets, scheduler termination — leans on this
//! vector being correct.

use crate::error::RuntimeError;
use basalt_graph::Graph;
use basalt_rational::{Rational, checked_lcm};

/// Solves the balance equations for `graph`.
///
/// Actor 0 is seeded with the candidate ratio 1/1 and required ratios are
/// propagated along connections (in either direction) until the fixpoint.
/// A conflicting requirement on an already-set actor, or any actor left
/// unreached, means no positive vector exists. The surviving fractions are
/// scaled by the least common multiple of their denominators, which yields
/// the canonical minimal solution.
///
/// A graph with no actors is trivially consistent with an empty vector.
pub fn repetition_vector(graph: &Graph) -> Result<Vec<u64>, RuntimeError> {
    if graph.actors.is_empty() {
        return Ok(Vec::new());
    }

    let mut candidates = vec![Rational::default(); graph.actors.len()];
    candidates[0] = Rational::reduced(1, 1);

    // Worklist of actors whose candidate was just fixed; each pass pushes the
    // required ratio across every connection touching the pivot.
    let mut pending = vec![0usize];
    while let Some(pivot) = pending.pop() {
        for connection in &graph.connections {
            let production = graph.source_port(connection).production as u64;
            let consumption = graph.destination_port(connection).consumption as u64;

            if connection.source.actor == pivot {
                propagate(
                    &mut candidates,
                    &mut pending,
                    pivot,
                    connection.destination.actor,
                    production,
                    consumption,
                )?;
            }
            if connection.destination.actor == pivot {
                propagate(
                    &mut candidates,
                    &mut pending,
                    pivot,
                    connection.source.actor,
                    consumption,
                    production,
                )?;
            }
        }
    }

    // An actor the propagation never reached has no rate relation to actor 0;
    // the graph is disconnected and no single positive vector covers it.
    if candidates.iter().any(Rational::is_zero) {
        return Err(RuntimeError::InconsistentGraph);
    }

    scale_to_integers(&candidates)
}

/// Requires `q[other] == q[pivot] · num_factor / den_factor`; sets the
/// candidate if unset, otherwise demands agreement.
fn propagate(
    candidates: &mut [Rational],
    pending: &mut Vec<usize>,
    pivot: usize,
    other: usize,
    num_factor: u64,
    den_factor: u64,
) -> Result<(), RuntimeError> {
    let required = candidates[pivot]
        .checked_scaled(num_factor, den_factor)
        .ok_or(RuntimeError::GraphTooLarge)?;
    let candidate = &mut candidates[other];
    if candidate.is_zero() {
        *candidate = required;
        pending.push(other);
    } else if !candidate.eq_ratio(required.num(), required.den()) {
        return Err(RuntimeError::InconsistentGraph);
    }
    Ok(())
}

fn scale_to_integers(candidates: &[Rational]) -> Result<Vec<u64>, RuntimeError> {
    let mut multiple = 1u64;
    for candidate in candidates {
        multiple = checked_lcm(multiple, candidate.den()).ok_or(RuntimeError::GraphTooLarge)?;
    }
    candidates
        .iter()
        .map(|candidate| {
            // den divides multiple, so the division is exact.
            (multiple / candidate.den())
                .checked_mul(candidate.num())
                .ok_or(RuntimeError::GraphTooLarge)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_graph::{Actor, Connection, InputPort, InputRef, OutputPort, OutputRef};

    fn noop(_consumed: &[u8], _produced: &mut [u8]) {}

    /// A chain of single-output/single-input actors with the given
    /// (production, consumption) rate per link, all over 1-byte tokens.
    fn chain(rates: &[(usize, usize)]) -> Graph {
        let num_actors = rates.len() + 1;
        let actors = (0..num_actors)
            .map(|id| Actor {
                execution: noop,
                inputs: if id == 0 {
                    vec![]
                } else {
                    vec![InputPort {
                        token_size: 1,
                        consumption: rates[id - 1].1,
                    }]
                },
                outputs: if id == num_actors - 1 {
                    vec![]
                } else {
                    vec![OutputPort {
                        token_size: 1,
                        production: rates[id].0,
                    }]
                },
            })
            .collect();
        let connections = (0..rates.len())
            .map(|link| Connection {
                source: OutputRef {
                    actor: link,
                    port: 0,
                },
                destination: InputRef {
                    actor: link + 1,
                    port: 0,
                },
                token_size: 1,
                initial_tokens: Vec::new(),
            })
            .collect();
        Graph {
            actors,
            connections,
        }
    }

    #[test]
    fn unit_rate_chain_fires_once_each() {
        let graph = chain(&[(1, 1), (1, 1)]);
        assert_eq!(repetition_vector(&graph).unwrap(), vec![1, 1, 1]);
    }

    #[test]
    fn multirate_chain_scales_by_rate_ratios() {
        // 3 produced per firing, 2 consumed per firing → q = [2, 3].
        let graph = chain(&[(3, 2)]);
        assert_eq!(repetition_vector(&graph).unwrap(), vec![2, 3]);
    }

    #[test]
    fn mismatched_cycle_is_inconsistent() {
        // A produces 1 but B consumes 1 and produces 2 back into a consumer
        // of 1 on A: 1·qA = 1·qB and 2·qB = 1·qA cannot both hold.
        let mut graph = chain(&[(1, 1)]);
        graph.actors[1].outputs.push(OutputPort {
            token_size: 1,
            production: 2,
        });
        graph.actors[0].inputs.push(InputPort {
            token_size: 1,
            consumption: 1,
        });
        graph.connections.push(Connection {
            source: OutputRef { actor: 1, port: 0 },
            destination: InputRef { actor: 0, port: 0 },
            token_size: 1,
            initial_tokens: Vec::new(),
        });
        assert!(matches!(
            repetition_vector(&graph),
            Err(RuntimeError::InconsistentGraph)
        ));
    }

    #[test]
    fn disconnected_actors_are_inconsistent() {
        let graph = Graph {
            actors: vec![
                Actor {
                    execution: noop,
                    inputs: vec![],
                    outputs: vec![],
                },
                Actor {
                    execution: noop,
                    inputs: vec![],
                    outputs: vec![],
                },
            ],
            connections: Vec::new(),
        };
        assert!(matches!(
            repetition_vector(&graph),
            Err(RuntimeError::InconsistentGraph)
        ));
    }

    #[test]
    fn empty_graph_has_empty_vector() {
        let graph = Graph::default();
        assert_eq!(repetition_vector(&graph).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn lone_actor_fires_once() {
        let graph = Graph {
            actors: vec![Actor {
                execution: noop,
                inputs: vec![],
                outputs: vec![],
            }],
            connections: Vec::new(),
        };
        assert_eq!(repetition_vector(&graph).unwrap(), vec![1]);
    }

    #[test]
    fn self_loop_with_equal_rates_is_consistent() {
        let graph = Graph {
            actors: vec![Actor {
                execution: noop,
                inputs: vec![InputPort {
                    token_size: 1,
                    consumption: 2,
                }],
                outputs: vec![OutputPort {
                    token_size: 1,
                    production: 2,
                }],
            }],
            connections: vec![Connection {
                source: OutputRef { actor: 0, port: 0 },
                destination: InputRef { actor: 0, port: 0 },
                token_size: 1,
                initial_tokens: Vec::new(),
            }],
        };
        assert_eq!(repetition_vector(&graph).unwrap(), vec![1]);
    }

    #[test]
    fn self_loop_with_unequal_rates_is_inconsistent() {
        let graph = Graph {
            actors: vec![Actor {
                execution: noop,
                inputs: vec![InputPort {
                    token_size: 1,
                    consumption: 2,
                }],
                outputs: vec![OutputPort {
                    token_size: 1,
                    production: 3,
                }],
            }],
            connections: vec![Connection {
                source: OutputRef { actor: 0, port: 0 },
                destination: InputRef { actor: 0, port: 0 },
                token_size: 1,
                initial_tokens: Vec::new(),
            }],
        };
        assert!(matches!(
            repetition_vector(&graph),
            Err(RuntimeError::InconsistentGraph)
        ));
    }

    #[test]
    fn solver_is_idempotent() {
        let graph = chain(&[(3, 2), (5, 7)]);
        let first = repetition_vector(&graph).unwrap();
        let second = repetition_vector(&graph).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn solution_is_minimal() {
        // q = [2, 3, ...]: any componentwise-smaller positive vector would
        // violate at least one balance equation, and the gcd of the solved
        // vector is 1 (the LCM construction cannot be scaled down).
        let graph = chain(&[(3, 2), (5, 7)]);
        let q = repetition_vector(&graph).unwrap();
        let overall_gcd = q.iter().copied().fold(0, basalt_rational::gcd);
        assert_eq!(overall_gcd, 1);
        for connection in &graph.connections {
            let production = graph.source_port(connection).production as u64;
            let consumption = graph.destination_port(connection).consumption as u64;
            assert_eq!(
                production * q[connection.source.actor],
                consumption * q[connection.destination.actor]
            );
        }
    }

    #[test]
    fn sample_vectors_match_hand_counts() {
        assert_eq!(
            repetition_vector(&basalt_samples::simple()).unwrap(),
            vec![1, 1, 1]
        );
        assert_eq!(
            repetition_vector(&basalt_samples::larger()).unwrap(),
            vec![2, 1]
        );
        assert_eq!(repetition_vector(&basalt_samples::feedback()).unwrap(), vec![1]);
    }

    #[test]
    fn perturbed_cycle_rate_is_inconsistent() {
        // Bumping one production rate inside the cycle leaves the double
        // connections demanding q0 = 2·q1 while the int connections demand
        // 8·q0 = 14·q1 — no positive vector satisfies both.
        let mut graph = basalt_samples::larger();
        graph.actors[0].outputs[1].production = 8;
        assert!(matches!(
            repetition_vector(&graph),
            Err(RuntimeError::InconsistentGraph)
        ));
    }

    #[test]
    fn huge_rates_overflow_to_graph_too_large() {
        // Two links each consuming 2^33 tokens: the candidate denominators
        // multiply to 2^66, past u64, before any reduction can help.
        let big = 1usize << 33;
        let graph = chain(&[(1, big), (1, big)]);
        assert!(matches!(
            repetition_vector(&graph),
            Err(RuntimeError::GraphTooLarge)
        ));
    }
}
