// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! Engine for deciding and constructing constrained perfect phylogenies
//! over a binary species/character matrix: a red-black graph realization
//! operator driven by a backtracking decision tree, with a serializable
//! state snapshot format for inspection and replay.

pub mod cleanup;
pub mod driver;
pub mod error;
pub mod graph;
pub mod loader;
pub mod realize;
pub mod snapshot;
pub mod state;
pub mod strategy;

pub use cleanup::cleanup;
pub use driver::{search, Driver, SearchOutcome};
pub use error::CpppError;
pub use graph::{GraphOps, UndirectedGraph};
pub use loader::InstanceReader;
pub use realize::realize;
pub use snapshot::{from_snapshot, read_snapshot, to_snapshot, write_snapshot, Snapshot};
pub use state::{Color, State};
pub use strategy::{ConflictIsolatedFirstStrategy, NaturalOrderStrategy, Strategy};
