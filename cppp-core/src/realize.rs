// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The Realization Operator (component D): applies a single character
//! realization, or rejects it, updating the red-black graph and running
//! cleanup on acceptance.

use crate::cleanup::cleanup;
use crate::graph::GraphOps;
use crate::state::{Color, State};

/// Realizes `src.realize` against `src`, producing a child state.
///
/// On acceptance (`operation` ends up 1 or 2), the child's red-black graph
/// has been mutated per the algorithm below and cleanup has already run.
/// On rejection (`operation == 0`) the caller must discard the returned
/// state; its graph has been partially mutated in a way that is only
/// meaningful while computing the rejection (spec §4.3 step 2 runs
/// unconditionally, ahead of the BLACK/RED branch).
pub fn realize(src: &State) -> State {
    let c = src.realize;
    debug_assert!(
        src.colors[c] != Color::Removed,
        "caller must never request realization of an already-removed character"
    );

    let mut dst = src.clone_for_child();
    let v = dst.char_vertex(c);

    let component = dst.rb.component(v).expect("v is in range by construction");
    let neighbors = dst.rb.neighbors(v).expect("v is in range by construction");
    let not_adjacent: Vec<usize> = component
        .iter()
        .copied()
        .filter(|x| *x != v && *x < dst.n0 && !neighbors.contains(x))
        .collect();

    dst.rb
        .remove_edges_incident(v)
        .expect("v is in range by construction");

    match src.colors[c] {
        Color::Black => {
            for species in &not_adjacent {
                dst.rb
                    .add_edge(v, *species)
                    .expect("species ids are in range by construction");
            }
            dst.colors[c] = Color::Red;
            dst.current_state[c] = 1;
            dst.operation = 1;
        }
        Color::Red => {
            if not_adjacent.is_empty() {
                dst.colors[c] = Color::Removed;
                dst.current_state[c] = -1;
                dst.char_active[c] = false;
                dst.m -= 1;
                dst.operation = 2;
            } else {
                dst.operation = 0;
                return dst;
            }
        }
        Color::Removed => unreachable!("realizing an already-removed character is undefined"),
    }

    dst.realize = c;
    cleanup(&mut dst);
    debug_assert!(
        dst.check_invariants().is_ok(),
        "realize produced a state violating its own invariants"
    );
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InstanceReader;

    #[test]
    fn black_to_red_on_an_isolated_character_succeeds_without_new_edges() {
        // 2 2 / 1 0 / 0 1: realizing character 0 accepts and its single
        // existing edge is the only edge afterwards (no `D` to add).
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let mut state = reader.next_instance().unwrap().unwrap();
        state.realize = 0;
        let child = realize(&state);
        assert_eq!(child.operation, 1);
        assert_eq!(child.colors[0], Color::Red);
    }

    #[test]
    fn red_character_with_empty_d_is_removed() {
        // 2 2 / 1 0 / 1 1: realize character 0 twice.
        let mut reader = InstanceReader::from_str("2 2\n1 0\n1 1\n").unwrap();
        let mut state = reader.next_instance().unwrap().unwrap();
        state.realize = 0;
        let once = realize(&state);
        assert_eq!(once.operation, 1);

        let mut twice_input = once;
        twice_input.realize = 0;
        let twice = realize(&twice_input);
        assert_eq!(twice.operation, 2);
        assert_eq!(twice.colors[0], Color::Removed);
        assert_eq!(twice.m, 1);
    }

    #[test]
    fn realizing_an_isolated_character_produces_a_solved_instance() {
        // A search is solved once `n == 0` (driver §4.6), regardless of
        // `m`: both characters here become free (RED, degree zero) as
        // soon as their sole species is realized away, but they stay
        // active until something explicitly retires them.
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let mut state = reader.next_instance().unwrap().unwrap();
        state.realize = 0;
        let after_first = realize(&state);
        assert_eq!(after_first.n, 1);
        assert_eq!(after_first.m, 2);
        assert_eq!(after_first.colors[0], Color::Red);

        let mut second_input = after_first;
        second_input.realize = 1;
        let after_second = realize(&second_input);
        assert_eq!(after_second.n, 0);
        assert_eq!(after_second.m, 2);
        assert_eq!(after_second.colors[1], Color::Red);
    }
}
