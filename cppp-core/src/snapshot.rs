// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The Snapshot Codec (component G): a serializable document format for a
//! `State`, split into a JSON document plus a pair of graph-exchange
//! sidecar files for the red-black and conflict graphs.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CpppError;
use crate::graph::{GraphOps, UndirectedGraph};
use crate::state::{Color, State};

/// The JSON document half of a snapshot. Field names follow the engine's
/// on-disk format exactly: `red_black_file`/`conflict_file` name the
/// sidecar files holding the two graphs, written and read separately via
/// [`UndirectedGraph::write_graph`]/[`UndirectedGraph::read_graph`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub num_species_orig: usize,
    pub num_characters_orig: usize,
    pub num_species: usize,
    pub num_characters: usize,
    pub realize: usize,
    pub tried_characters: Vec<usize>,
    pub character_queue: Vec<usize>,
    pub current: Vec<i8>,
    pub species: Vec<bool>,
    pub characters: Vec<bool>,
    pub red_black_file: String,
    pub conflict_file: String,
    /// Only populated for a root-level dump of the original instance,
    /// mirroring the source's `if (stp->matrix != NULL)` guard.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matrix: Option<Vec<u8>>,
}

/// Builds the JSON half of a snapshot from `state`, naming the sidecar
/// graph files `red_black_file`/`conflict_file`.
pub fn to_snapshot(
    state: &State,
    red_black_file: impl Into<String>,
    conflict_file: impl Into<String>,
    include_matrix: bool,
) -> Snapshot {
    Snapshot {
        num_species_orig: state.n0,
        num_characters_orig: state.m0,
        num_species: state.n,
        num_characters: state.m,
        realize: state.realize,
        tried_characters: state.tried_characters.iter().copied().collect(),
        character_queue: state.character_queue.iter().copied().collect(),
        current: state.current_state.clone(),
        species: state.species_active.clone(),
        characters: state.char_active.clone(),
        red_black_file: red_black_file.into(),
        conflict_file: conflict_file.into(),
        matrix: if include_matrix {
            Some((*state.matrix).clone())
        } else {
            None
        },
    }
}

/// Reassembles a `State` from a `Snapshot` plus the two graphs read from
/// its sidecar files. The matrix must be supplied by the caller when the
/// snapshot itself carries none (it is shared read-only across an
/// instance's whole decision tree, not re-dumped at every level).
pub fn from_snapshot(
    snap: &Snapshot,
    rb: UndirectedGraph,
    cg: UndirectedGraph,
    matrix: Arc<Vec<u8>>,
) -> Result<State, CpppError> {
    if snap.current.len() != snap.num_characters_orig
        || snap.species.len() != snap.num_species_orig
        || snap.characters.len() != snap.num_characters_orig
    {
        return Err(CpppError::SnapshotCorrupt(
            "array lengths disagree with the declared original counts".to_string(),
        ));
    }

    let colors = snap
        .current
        .iter()
        .map(|&c| match c {
            1 => Ok(Color::Red),
            -1 => Ok(Color::Removed),
            0 => Ok(Color::Black),
            other => Err(CpppError::SnapshotCorrupt(format!(
                "current_state entry out of range: {other}"
            ))),
        })
        .collect::<Result<Vec<Color>, CpppError>>()?;

    Ok(State {
        n0: snap.num_species_orig,
        m0: snap.num_characters_orig,
        n: snap.num_species,
        m: snap.num_characters,
        matrix,
        species_active: snap.species.clone(),
        char_active: snap.characters.clone(),
        colors,
        current_state: snap.current.clone(),
        operation: 0,
        realize: snap.realize,
        tried_characters: snap.tried_characters.iter().copied().collect(),
        character_queue: snap.character_queue.iter().copied().collect(),
        rb,
        cg,
    })
}

/// Writes `state` as a snapshot: the JSON document to `doc`, and the two
/// graphs to `rb_sink`/`cg_sink` in the graph-exchange format.
pub fn write_snapshot(
    state: &State,
    doc: impl Write,
    rb_sink: impl Write,
    cg_sink: impl Write,
    red_black_file: impl Into<String>,
    conflict_file: impl Into<String>,
    include_matrix: bool,
) -> Result<(), CpppError> {
    let snap = to_snapshot(state, red_black_file, conflict_file, include_matrix);
    serde_json::to_writer_pretty(doc, &snap)
        .map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    state
        .rb
        .write_graph(rb_sink)
        .map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    state
        .cg
        .write_graph(cg_sink)
        .map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    Ok(())
}

/// Reads a snapshot previously produced by [`write_snapshot`]. `matrix` must
/// come from the caller when the document omits it.
pub fn read_snapshot(
    doc: impl std::io::Read,
    rb_source: impl BufRead,
    cg_source: impl BufRead,
    matrix: Arc<Vec<u8>>,
) -> Result<State, CpppError> {
    let snap: Snapshot =
        serde_json::from_reader(doc).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let rb = UndirectedGraph::read_graph(rb_source)?;
    let cg = UndirectedGraph::read_graph(cg_source)?;
    let matrix = snap
        .matrix
        .clone()
        .map(Arc::new)
        .unwrap_or(matrix);
    from_snapshot(&snap, rb, cg, matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InstanceReader;

    #[test]
    fn round_trips_a_freshly_loaded_instance() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let state = reader.next_instance().unwrap().unwrap();

        let mut doc = Vec::new();
        let mut rb_buf = Vec::new();
        let mut cg_buf = Vec::new();
        write_snapshot(
            &state,
            &mut doc,
            &mut rb_buf,
            &mut cg_buf,
            "rb.graph",
            "cg.graph",
            true,
        )
        .unwrap();

        let restored = read_snapshot(
            doc.as_slice(),
            rb_buf.as_slice(),
            cg_buf.as_slice(),
            Arc::new(Vec::new()),
        )
        .unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn omitted_matrix_falls_back_to_the_caller_supplied_one() {
        let mut reader = InstanceReader::from_str("2 2\n1 0\n0 1\n").unwrap();
        let state = reader.next_instance().unwrap().unwrap();

        let mut doc = Vec::new();
        let mut rb_buf = Vec::new();
        let mut cg_buf = Vec::new();
        write_snapshot(
            &state,
            &mut doc,
            &mut rb_buf,
            &mut cg_buf,
            "rb.graph",
            "cg.graph",
            false,
        )
        .unwrap();

        let restored = read_snapshot(
            doc.as_slice(),
            rb_buf.as_slice(),
            cg_buf.as_slice(),
            Arc::clone(&state.matrix),
        )
        .unwrap();
        assert_eq!(*restored.matrix, *state.matrix);
    }

    #[test]
    fn rejects_mismatched_array_lengths() {
        let snap = Snapshot {
            num_species_orig: 2,
            num_characters_orig: 2,
            num_species: 2,
            num_characters: 2,
            realize: 0,
            tried_characters: vec![],
            character_queue: vec![],
            current: vec![0],
            species: vec![true, true],
            characters: vec![true, true],
            red_black_file: "rb.graph".to_string(),
            conflict_file: "cg.graph".to_string(),
            matrix: None,
        };
        let rb = UndirectedGraph::new(4);
        let cg = UndirectedGraph::new(2);
        let err = from_snapshot(&snap, rb, cg, Arc::new(vec![1, 0, 0, 1])).unwrap_err();
        assert!(matches!(err, CpppError::SnapshotCorrupt(_)));
    }
}
