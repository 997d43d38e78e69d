// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

// Error kinds for the constrained-perfect-phylogeny engine.
//
// `RealizationRejected` and `NoSolution` are deliberately absent here: per
// the engine's contract they are first-class outcomes of the realization
// operator and the decision-tree driver, not exceptional conditions. See
// `realize::realize` and `driver::SearchOutcome`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpppError {
    /// The instance loader found a non-binary cell or a truncated instance.
    MalformedInput(String),
    /// A `GraphOps` precondition was violated (out-of-range vertex id). Always fatal.
    GraphCorrupt(String),
    /// The snapshot codec found a missing or wrongly-typed field.
    SnapshotCorrupt(String),
}

impl fmt::Display for CpppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpppError::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            CpppError::GraphCorrupt(msg) => write!(f, "graph corrupt: {msg}"),
            CpppError::SnapshotCorrupt(msg) => write!(f, "snapshot corrupt: {msg}"),
        }
    }
}

impl std::error::Error for CpppError {}
