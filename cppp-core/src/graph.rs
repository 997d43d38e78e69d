// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! The `GraphOps` capability: the abstract undirected-graph operations that
//! the realization operator and cleanup pass need, backed concretely by
//! `petgraph::graphmap::UnGraphMap`.
//!
//! Vertex ids are plain `usize`s and are never renumbered by any operation
//! here, matching the fixed-vertex-id requirement of the red-black and
//! conflict graphs (spec §3.2, §3.3).

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use fnv::FnvHashSet;
use petgraph::graphmap::UnGraphMap;

use crate::error::CpppError;

/// Operations needed by the realization operator, cleanup, and the snapshot
/// codec. A concrete implementer only needs to support exactly these; the
/// engine never reaches into `petgraph` directly outside this module.
pub trait GraphOps: Clone {
    /// A fresh graph with `vertex_count` isolated vertices, ids `0..vertex_count`.
    fn new(vertex_count: usize) -> Self;

    fn vertex_count(&self) -> usize;

    /// Add an undirected edge `(u, v)`. Idempotent if the edge already exists.
    fn add_edge(&mut self, u: usize, v: usize) -> Result<(), CpppError>;

    /// Remove every edge incident on `v`, leaving `v` present but isolated.
    fn remove_edges_incident(&mut self, v: usize) -> Result<(), CpppError>;

    /// Neighbors of `v`, in sorted order.
    fn neighbors(&self, v: usize) -> Result<Vec<usize>, CpppError>;

    /// The connected component containing `v`, as a sorted vertex sequence
    /// (always includes `v` itself, even if `v` is isolated).
    fn component(&self, v: usize) -> Result<Vec<usize>, CpppError>;

    /// Number of edges incident on `v`.
    fn degree(&self, v: usize) -> Result<usize, CpppError>;

    /// Write this graph in the engine's stable graph-exchange format.
    fn write_graph<W: Write>(&self, w: W) -> io::Result<()>;

    /// Read a graph previously written by `write_graph`.
    fn read_graph<R: BufRead>(r: R) -> Result<Self, CpppError>
    where
        Self: Sized;
}

/// The concrete `GraphOps` implementation used by every `State`.
#[derive(Debug, Clone)]
pub struct UndirectedGraph {
    vertex_count: usize,
    inner: UnGraphMap<usize, ()>,
}

impl UndirectedGraph {
    fn check_vertex(&self, v: usize) -> Result<(), CpppError> {
        if v >= self.vertex_count {
            Err(CpppError::GraphCorrupt(format!(
                "vertex {v} out of range for a graph of {} vertices",
                self.vertex_count
            )))
        } else {
            Ok(())
        }
    }
}

impl GraphOps for UndirectedGraph {
    fn new(vertex_count: usize) -> Self {
        let mut inner = UnGraphMap::with_capacity(vertex_count, 0);
        for v in 0..vertex_count {
            inner.add_node(v);
        }
        UndirectedGraph {
            vertex_count,
            inner,
        }
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn add_edge(&mut self, u: usize, v: usize) -> Result<(), CpppError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        self.inner.add_edge(u, v, ());
        Ok(())
    }

    fn remove_edges_incident(&mut self, v: usize) -> Result<(), CpppError> {
        self.check_vertex(v)?;
        let neighbors: Vec<usize> = self.inner.neighbors(v).collect();
        for n in neighbors {
            self.inner.remove_edge(v, n);
        }
        Ok(())
    }

    fn neighbors(&self, v: usize) -> Result<Vec<usize>, CpppError> {
        self.check_vertex(v)?;
        let mut result: Vec<usize> = self.inner.neighbors(v).collect();
        result.sort_unstable();
        Ok(result)
    }

    fn component(&self, v: usize) -> Result<Vec<usize>, CpppError> {
        self.check_vertex(v)?;
        let mut visited = FnvHashSet::default();
        let mut frontier = VecDeque::new();
        visited.insert(v);
        frontier.push_back(v);
        while let Some(cur) = frontier.pop_front() {
            for n in self.inner.neighbors(cur) {
                if visited.insert(n) {
                    frontier.push_back(n);
                }
            }
        }
        let mut result: Vec<usize> = visited.into_iter().collect();
        result.sort_unstable();
        Ok(result)
    }

    fn degree(&self, v: usize) -> Result<usize, CpppError> {
        self.check_vertex(v)?;
        Ok(self.inner.neighbors(v).count())
    }

    fn write_graph<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "{}", self.vertex_count)?;
        let mut edges: Vec<(usize, usize)> = self
            .inner
            .all_edges()
            .map(|(a, b, ())| if a <= b { (a, b) } else { (b, a) })
            .collect();
        edges.sort_unstable();
        for (a, b) in edges {
            writeln!(w, "{a} {b}")?;
        }
        Ok(())
    }

    fn read_graph<R: BufRead>(r: R) -> Result<Self, CpppError> {
        let mut lines = r.lines();
        let header = lines
            .next()
            .ok_or_else(|| CpppError::SnapshotCorrupt("empty graph-exchange file".to_string()))?
            .map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
        let vertex_count: usize = header
            .trim()
            .parse()
            .map_err(|_| CpppError::SnapshotCorrupt(format!("bad vertex count: {header:?}")))?;
        let mut graph = UndirectedGraph::new(vertex_count);
        for line in lines {
            let line = line.map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let u: usize = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CpppError::SnapshotCorrupt(format!("bad edge line: {line:?}")))?;
            let v: usize = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CpppError::SnapshotCorrupt(format!("bad edge line: {line:?}")))?;
            graph.add_edge(u, v).map_err(|e| match e {
                CpppError::GraphCorrupt(msg) => CpppError::SnapshotCorrupt(msg),
                other => other,
            })?;
        }
        Ok(graph)
    }
}
