// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The `State` data model: matrix, per-character color/current-state,
//! per-species activity, the red-black and conflict graphs, and the
//! search-frontier lists that belong to a single decision-tree node.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::CpppError;
use crate::graph::{GraphOps, UndirectedGraph};

/// A character's realization status. Closed sum type, per the redesign note
/// in the spec: the source encodes `REMOVED` as `RED + 1`, which this
/// replaces with a proper enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Not yet realized.
    Black,
    /// Realized; the character vertex is still present.
    Red,
    /// Realized and eliminated because it was free.
    Removed,
}

/// One node of the decision tree: the instance as currently reduced, plus
/// the per-level search bookkeeping (`tried_characters`, `character_queue`).
#[derive(Debug, Clone)]
pub struct State {
    /// Original species count; immutable for a given instance.
    pub n0: usize,
    /// Original character count; immutable for a given instance.
    pub m0: usize,
    /// Currently active species count.
    pub n: usize,
    /// Currently active character count.
    pub m: usize,
    /// The original binary matrix, row-major, `n0 * m0` entries. Shared
    /// read-only across every `State` derived from the same instance.
    pub matrix: Arc<Vec<u8>>,
    pub species_active: Vec<bool>,
    pub char_active: Vec<bool>,
    pub colors: Vec<Color>,
    /// `{0, 1, -1}`; `-1` means the character has been removed.
    pub current_state: Vec<i8>,
    /// Outcome tag of the last realization attempt on this state: 0
    /// rejected, 1 realized (black -> red), 2 realized and removed.
    pub operation: u8,
    /// The character index targeted by the next/last realization attempt;
    /// on a state reached by a successful realization, this is the move
    /// that produced it.
    pub realize: usize,
    pub tried_characters: VecDeque<usize>,
    pub character_queue: VecDeque<usize>,
    pub rb: UndirectedGraph,
    pub cg: UndirectedGraph,
}

impl State {
    /// The red-black graph vertex id for character `c`.
    pub fn char_vertex(&self, c: usize) -> usize {
        self.n0 + c
    }

    /// A deep copy suitable for becoming a decision-tree child: independent
    /// `rb`/`cg` graphs and arrays, matrix shared by reference, per-level
    /// search lists reset to empty (children never inherit a parent's
    /// tried/queue lists, see spec §3.4).
    pub fn clone_for_child(&self) -> State {
        State {
            n0: self.n0,
            m0: self.m0,
            n: self.n,
            m: self.m,
            matrix: Arc::clone(&self.matrix),
            species_active: self.species_active.clone(),
            char_active: self.char_active.clone(),
            colors: self.colors.clone(),
            current_state: self.current_state.clone(),
            operation: self.operation,
            realize: self.realize,
            tried_characters: VecDeque::new(),
            character_queue: VecDeque::new(),
            rb: self.rb.clone(),
            cg: self.cg.clone(),
        }
    }

    /// Checks the quantified invariants that must hold after every accepted
    /// operation (spec §8, properties 1-4). Violations here indicate a
    /// programmer error in the engine, not a malformed instance.
    pub fn check_invariants(&self) -> Result<(), CpppError> {
        let active_species = self.species_active.iter().filter(|&&a| a).count();
        if active_species != self.n {
            return Err(CpppError::GraphCorrupt(format!(
                "species_active sums to {active_species}, but n={}",
                self.n
            )));
        }
        let active_chars = self.char_active.iter().filter(|&&a| a).count();
        if active_chars != self.m {
            return Err(CpppError::GraphCorrupt(format!(
                "char_active sums to {active_chars}, but m={}",
                self.m
            )));
        }
        for c in 0..self.m0 {
            let removed = self.colors[c] == Color::Removed;
            let minus_one = self.current_state[c] == -1;
            let inactive = !self.char_active[c];
            if removed != minus_one || minus_one != inactive {
                return Err(CpppError::GraphCorrupt(format!(
                    "character {c} disagrees on removed/current_state/active: {removed} {minus_one} {inactive}"
                )));
            }
        }
        for s in 0..self.n0 {
            for n in self.rb.neighbors(s).unwrap_or_default() {
                if n < self.n0 {
                    continue;
                }
                let c = n - self.n0;
                if !self.species_active[s] {
                    return Err(CpppError::GraphCorrupt(format!(
                        "edge ({s}, {n}) touches inactive species {s}"
                    )));
                }
                if self.colors[c] == Color::Removed {
                    return Err(CpppError::GraphCorrupt(format!(
                        "edge ({s}, {n}) touches removed character {c}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.n0 == other.n0
            && self.m0 == other.m0
            && self.n == other.n
            && self.m == other.m
            && self.species_active == other.species_active
            && self.char_active == other.char_active
            && self.colors == other.colors
            && self.current_state == other.current_state
            && self.operation == other.operation
            && self.realize == other.realize
            && self.tried_characters == other.tried_characters
            && self.character_queue == other.character_queue
            && (0..self.n0 + self.m0).all(|v| {
                self.rb.neighbors(v).unwrap_or_default() == other.rb.neighbors(v).unwrap_or_default()
            })
            && (0..self.m0).all(|v| {
                self.cg.neighbors(v).unwrap_or_default() == other.cg.neighbors(v).unwrap_or_default()
            })
    }
}
