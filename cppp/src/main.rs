// Copyright 2026 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! `cppp`: a thin command-line collaborator around `cppp-core`.
//!
//! Bare invocation runs a handful of self-test scenarios and exits
//! non-zero on the first failure. `cppp solve` drives one or more
//! concatenated instances to a witness or a failure report. `cppp replay`
//! implements the engine's snapshot-based replay mode, used to regression
//! test individual search nodes without re-running the whole search.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use cppp_core::{
    read_snapshot, realize, search, write_snapshot, CpppError, InstanceReader,
    ConflictIsolatedFirstStrategy, NaturalOrderStrategy, SearchOutcome, State, Strategy,
};

#[derive(Parser)]
#[command(name = "cppp", about = "Constrained perfect phylogeny search engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Drive every concatenated instance in a file to a witness or a failure report.
    Solve {
        instance_file: PathBuf,
        #[arg(long, value_enum, default_value = "natural-order")]
        strategy: StrategyArg,
    },
    /// Run the engine's replay mode against a replay control document.
    Replay { document: PathBuf },
}

#[derive(Copy, Clone, ValueEnum)]
enum StrategyArg {
    NaturalOrder,
    ConflictIsolatedFirst,
}

impl StrategyArg {
    fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyArg::NaturalOrder => Box::new(NaturalOrderStrategy),
            StrategyArg::ConflictIsolatedFirst => Box::new(ConflictIsolatedFirstStrategy),
        }
    }
}

/// The control document for `cppp replay`: distinct from a state `Snapshot`,
/// this names the input/output snapshot files and the realization order to
/// apply. The `test` tag exists purely as a self-check that the document was
/// meant for replay and not accidentally passed in some other shape.
#[derive(Deserialize)]
struct ReplayDocument {
    test: u8,
    input: String,
    output: String,
    characters: Vec<usize>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        None => run_self_tests(),
        Some(Command::Solve {
            instance_file,
            strategy,
        }) => run_solve(&instance_file, strategy.build().as_ref()),
        Some(Command::Replay { document }) => run_replay(&document),
    };

    match result {
        Ok(true) => exit(0),
        Ok(false) => exit(1),
        Err(e) => {
            log::error!("{e}");
            exit(2);
        }
    }
}

fn run_solve(path: &Path, strategy: &dyn Strategy) -> Result<bool, CpppError> {
    let file = File::open(path).map_err(|e| CpppError::MalformedInput(e.to_string()))?;
    let mut reader = InstanceReader::from_reader(file)?;

    let mut index = 0;
    let mut all_solved = true;
    while let Some(state) = reader.next_instance()? {
        match search(state, strategy) {
            SearchOutcome::Success(witness) => {
                println!("instance {index}: solved, witness = {witness:?}");
            }
            SearchOutcome::Failure => {
                println!("instance {index}: no solution");
                all_solved = false;
            }
        }
        index += 1;
    }
    Ok(all_solved)
}

fn run_replay(document_path: &Path) -> Result<bool, CpppError> {
    let text =
        std::fs::read_to_string(document_path).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let doc: ReplayDocument =
        serde_json::from_str(&text).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    if doc.test != 1 {
        return Err(CpppError::SnapshotCorrupt(format!(
            "expected a replay document with test == 1, got {}",
            doc.test
        )));
    }

    let base = document_path.parent().unwrap_or_else(|| Path::new("."));
    let mut state = load_state(&base.join(&doc.input))?;

    let mut all_accepted = true;
    if doc.characters.is_empty() {
        cppp_core::cleanup(&mut state);
    } else {
        for c in doc.characters {
            state.realize = c;
            let child = realize(&state);
            if child.operation == 0 {
                log::warn!("replay: character {c} was rejected");
                all_accepted = false;
                break;
            }
            state = child;
        }
    }

    write_state(&state, &base.join(&doc.output))?;
    Ok(all_accepted)
}

fn load_state(path: &Path) -> Result<State, CpppError> {
    let doc = File::open(path).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut peek = String::new();
    BufReader::new(File::open(path).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?)
        .read_to_string(&mut peek)
        .map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let raw: serde_json::Value =
        serde_json::from_str(&peek).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let rb_file = raw
        .get("red_black_file")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CpppError::SnapshotCorrupt("missing red_black_file".to_string()))?;
    let cg_file = raw
        .get("conflict_file")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CpppError::SnapshotCorrupt("missing conflict_file".to_string()))?;

    let rb_reader = BufReader::new(
        File::open(base.join(rb_file)).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?,
    );
    let cg_reader = BufReader::new(
        File::open(base.join(cg_file)).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?,
    );
    read_snapshot(doc, rb_reader, cg_reader, Arc::new(Vec::new()))
}

fn write_state(state: &State, path: &Path) -> Result<(), CpppError> {
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let rb_file = format!(
        "{}.rb.graph",
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("state")
    );
    let cg_file = format!(
        "{}.cg.graph",
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("state")
    );

    let doc = File::create(path).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let rb_sink =
        File::create(base.join(&rb_file)).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    let cg_sink =
        File::create(base.join(&cg_file)).map_err(|e| CpppError::SnapshotCorrupt(e.to_string()))?;
    write_snapshot(state, doc, rb_sink, cg_sink, rb_file, cg_file, false)
}

fn run_self_tests() -> Result<bool, CpppError> {
    let scenarios: &[(&str, &str, bool)] = &[
        ("S1", "2 2\n1 0\n0 1\n", true),
        // With only 3 species rows, no character pair can ever exhibit all
        // four gamete states, so `CG` is edgeless here and this solves.
        ("S2", "3 3\n1 1 0\n1 0 1\n0 1 1\n", true),
        ("S3", "3 2\n1 0\n1 1\n0 1\n", true),
        ("S6", "1 1\n1\n", true),
    ];

    let mut all_passed = true;
    for (name, instance, expect_solvable) in scenarios {
        let mut reader = InstanceReader::from_str(instance)?;
        let state = reader
            .next_instance()?
            .ok_or_else(|| CpppError::MalformedInput(format!("{name}: empty instance")))?;
        let solvable = matches!(search(state, &NaturalOrderStrategy), SearchOutcome::Success(_));
        if solvable == *expect_solvable {
            println!("{name}: ok");
        } else {
            println!("{name}: FAILED (expected solvable = {expect_solvable}, got {solvable})");
            all_passed = false;
        }
    }
    Ok(all_passed)
}
