// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The Instance Loader (component A): parses an `n m` header plus `n*m`
//! binary matrix into a fresh `State`, building both the red-black graph
//! and the conflict graph in the same pass.

use std::collections::VecDeque;
use std::io::Read;
use std::sync::Arc;

use crate::error::CpppError;
use crate::graph::{GraphOps, UndirectedGraph};
use crate::state::{Color, State};

/// Reads whitespace-separated integer tokens from a stream, across
/// potentially many concatenated instances, matching the source's
/// `fscanf`-style loop-until-EOF contract (spec §4.2, §6).
pub struct InstanceReader {
    tokens: std::vec::IntoIter<String>,
}

impl InstanceReader {
    pub fn from_reader(mut r: impl Read) -> Result<Self, CpppError> {
        let mut text = String::new();
        r.read_to_string(&mut text)
            .map_err(|e| CpppError::MalformedInput(e.to_string()))?;
        Self::from_str(&text)
    }

    pub fn from_str(text: &str) -> Result<Self, CpppError> {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        Ok(InstanceReader {
            tokens: tokens.into_iter(),
        })
    }

    fn next_token(&mut self) -> Option<String> {
        self.tokens.next()
    }

    fn next_usize(&mut self) -> Result<Option<usize>, CpppError> {
        match self.next_token() {
            None => Ok(None),
            Some(tok) => tok
                .parse::<usize>()
                .map(Some)
                .map_err(|_| CpppError::MalformedInput(format!("expected an integer, got {tok:?}"))),
        }
    }

    /// Parses the next concatenated instance, or returns `Ok(None)` at clean EOF.
    pub fn next_instance(&mut self) -> Result<Option<State>, CpppError> {
        let n = match self.next_usize()? {
            None => return Ok(None),
            Some(n) => n,
        };
        let m = self
            .next_usize()?
            .ok_or_else(|| CpppError::MalformedInput("truncated instance: missing m".to_string()))?;

        let mut matrix = Vec::with_capacity(n * m);
        for s in 0..n {
            for c in 0..m {
                let tok = self.next_token().ok_or_else(|| {
                    CpppError::MalformedInput(format!(
                        "truncated instance: missing cell ({s}, {c})"
                    ))
                })?;
                let bit: u8 = match tok.as_str() {
                    "0" => 0,
                    "1" => 1,
                    other => {
                        return Err(CpppError::MalformedInput(format!(
                            "non-binary cell ({s}, {c}): {other:?}"
                        )))
                    }
                };
                matrix.push(bit);
            }
        }

        Ok(Some(build_state(n, m, matrix)))
    }
}

fn build_state(n: usize, m: usize, matrix: Vec<u8>) -> State {
    let mut rb = UndirectedGraph::new(n + m);
    for s in 0..n {
        for c in 0..m {
            if matrix[s * m + c] == 1 {
                rb.add_edge(s, n + c).expect("vertex ids are in range by construction");
            }
        }
    }

    let mut cg = UndirectedGraph::new(m);
    for c1 in 0..m {
        for c2 in (c1 + 1)..m {
            let mut seen = [[false; 2]; 2];
            for s in 0..n {
                let v1 = matrix[s * m + c1] as usize;
                let v2 = matrix[s * m + c2] as usize;
                seen[v1][v2] = true;
            }
            if seen[0][0] && seen[0][1] && seen[1][0] && seen[1][1] {
                cg.add_edge(c1, c2).expect("vertex ids are in range by construction");
            }
        }
    }

    State {
        n0: n,
        m0: m,
        n,
        m,
        matrix: Arc::new(matrix),
        species_active: vec![true; n],
        char_active: vec![true; m],
        colors: vec![Color::Black; m],
        current_state: vec![0; m],
        operation: 0,
        realize: 0,
        tried_characters: VecDeque::new(),
        character_queue: VecDeque::new(),
        rb,
        cg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_instance() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let state = reader.next_instance().unwrap().unwrap();
        assert_eq!(state.n0, 2);
        assert_eq!(state.m0, 2);
        assert_eq!(*state.matrix, vec![1, 0, 0, 1]);
        assert_eq!(state.rb.neighbors(0).unwrap(), vec![2]);
        assert_eq!(state.rb.neighbors(1).unwrap(), vec![3]);
        assert!(reader.next_instance().unwrap().is_none());
    }

    #[test]
    fn parses_concatenated_instances() {
        let mut reader = InstanceReader::from_str("1 1\n1\n1 1\n0\n").unwrap();
        assert!(reader.next_instance().unwrap().is_some());
        assert!(reader.next_instance().unwrap().is_some());
        assert!(reader.next_instance().unwrap().is_none());
    }

    #[test]
    fn rejects_non_binary_cells() {
        let mut reader = InstanceReader::from_str("1 1\n2\n").unwrap();
        assert!(matches!(
            reader.next_instance(),
            Err(CpppError::MalformedInput(_))
        ));
    }

    #[test]
    fn rejects_truncated_instances() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n").unwrap();
        assert!(matches!(
            reader.next_instance(),
            Err(CpppError::MalformedInput(_))
        ));
    }

    #[test]
    fn three_species_cannot_exhibit_a_four_gamete_conflict() {
        // 3 3 / 1 1 0 / 1 0 1 / 0 1 1: with only 3 species rows, no pair of
        // columns can ever show all four of {(0,0),(0,1),(1,0),(1,1)}, so
        // `CG` comes out edgeless rather than the triangle a naive reading
        // of this matrix might suggest.
        let mut reader = InstanceReader::from_str("3 3\n1 1 0\n1 0 1\n0 1 1\n").unwrap();
        let state = reader.next_instance().unwrap().unwrap();
        assert_eq!(state.cg.neighbors(0).unwrap(), Vec::<usize>::new());
        assert_eq!(state.cg.neighbors(1).unwrap(), Vec::<usize>::new());
        assert_eq!(state.cg.neighbors(2).unwrap(), Vec::<usize>::new());
    }
}
