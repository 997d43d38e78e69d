// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! Strategy (component input to F): a pure function from `State` to the
//! ordered sequence of candidate characters to try at the current level.
//!
//! The decision-tree driver treats a `Strategy` as an opaque oracle; its
//! only contract is that every returned index is active and not removed
//! (spec §4.5). Any concrete strategy plugs in unchanged.

use crate::graph::GraphOps;
use crate::state::{Color, State};

pub trait Strategy {
    /// Candidate characters to try at `state`'s current level, in the
    /// order they should be tried.
    fn candidates(&self, state: &State) -> Vec<usize>;
}

fn active_characters(state: &State) -> Vec<usize> {
    (0..state.m0)
        .filter(|&c| state.char_active[c] && state.colors[c] != Color::Removed)
        .collect()
}

/// Tries every active character in index order.
pub struct NaturalOrderStrategy;

impl Strategy for NaturalOrderStrategy {
    fn candidates(&self, state: &State) -> Vec<usize> {
        active_characters(state)
    }
}

/// Tries characters with fewer conflict-graph neighbors first, on the
/// theory that characters unconstrained by the conflict graph are safer to
/// commit to early. Ties broken by index order.
pub struct ConflictIsolatedFirstStrategy;

impl Strategy for ConflictIsolatedFirstStrategy {
    fn candidates(&self, state: &State) -> Vec<usize> {
        let mut candidates = active_characters(state);
        candidates.sort_by_key(|&c| (state.cg.degree(c).unwrap_or(0), c));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InstanceReader;

    #[test]
    fn natural_order_returns_active_characters_in_index_order() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let state = reader.next_instance().unwrap().unwrap();
        assert_eq!(NaturalOrderStrategy.candidates(&state), vec![0, 1]);
    }

    #[test]
    fn conflict_isolated_first_prefers_low_conflict_degree() {
        // 3 3 / 1 1 0 / 1 0 1 / 0 1 1: with only 3 species rows `CG` is
        // edgeless, so all three characters tie at conflict-degree 0 and
        // the order falls back to index.
        let mut reader = InstanceReader::from_str("3 3\n1 1 0\n1 0 1\n0 1 1\n").unwrap();
        let state = reader.next_instance().unwrap().unwrap();
        assert_eq!(
            ConflictIsolatedFirstStrategy.candidates(&state),
            vec![0, 1, 2]
        );
    }
}
