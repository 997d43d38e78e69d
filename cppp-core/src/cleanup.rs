// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! Cleanup (component E): removes isolated (null) species and characters
//! from a `State` after a realization.

use crate::graph::GraphOps;
use crate::state::{Color, State};

/// Scans `species_active`/`char_active`, deactivating any still-active
/// species, or BLACK character, whose red-black degree has dropped to zero.
///
/// A BLACK character at degree zero is a *null* character (glossary):
/// vacuous, never constraining any species, so it is swept here and forced
/// to `Color::Removed` with `current_state == -1`. A RED character at
/// degree zero is a different thing, a *free* character whose neighborhood
/// already equals its whole component; it is left active so the realize
/// operator's own RED branch can accept a second realization of it with
/// `operation == 2`, per §4.3 step 4. Sweeping it here instead would strand
/// the caller with no legal way to retire it.
pub fn cleanup(state: &mut State) {
    for s in 0..state.n0 {
        if state.species_active[s] && state.rb.degree(s).unwrap_or(0) == 0 {
            state.species_active[s] = false;
            state.n -= 1;
        }
    }

    for c in 0..state.m0 {
        if state.char_active[c] && state.colors[c] == Color::Black {
            let v = state.char_vertex(c);
            if state.rb.degree(v).unwrap_or(0) == 0 {
                state.char_active[c] = false;
                state.m -= 1;
                state.colors[c] = Color::Removed;
                state.current_state[c] = -1;
            }
        }
    }

    debug_assert!(
        state.check_invariants().is_ok(),
        "cleanup produced a state violating its own invariants"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InstanceReader;

    #[test]
    fn cleanup_is_idempotent() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let mut state = reader.next_instance().unwrap().unwrap();
        state.rb.remove_edges_incident(0).unwrap();
        cleanup(&mut state);
        let once = state.clone();
        cleanup(&mut state);
        assert_eq!(state, once);
    }

    #[test]
    fn isolating_a_species_deactivates_it_and_its_sole_character() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let mut state = reader.next_instance().unwrap().unwrap();
        state.rb.remove_edges_incident(0).unwrap();
        cleanup(&mut state);
        assert!(!state.species_active[0]);
        assert!(!state.char_active[0]);
        assert_eq!(state.n, 1);
        assert_eq!(state.m, 1);
        assert_eq!(state.colors[0], crate::state::Color::Removed);
        assert_eq!(state.current_state[0], -1);
    }
}
