// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Command-line surface, scoped to exercising the scheduler end to end
//! rather than the teacher's full pipeline-management surface
//! (`create`/`list`/`show`/`delete`/`benchmark`/...): this crate has no
//! pipeline repository to manage, just a recipe to run.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// `linepipe` — run a streaming transformation pipeline over a file or
/// stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "linepipe")]
#[command(version)]
#[command(about = "Run a streaming transformation pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug-level logging (overridden by `RUST_LOG` if set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Optional TOML file of recipe defaults (log level, deflate level,
    /// passphrase environment variable).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a pipeline from an ordered list of `--stage` flags and run it
    /// to completion.
    Run {
        /// Input file path; reads stdin if omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file path; writes stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// A transformer stage, in the order it should run. May be repeated.
        /// Examples: `base64-encode`, `deflate:9`, `encrypt:mykey`,
        /// `remove:027`, `replace:aeiou=_`.
        #[arg(long = "stage")]
        stages: Vec<String>,
    },

    /// Convenience wrapper around `run` with a single SHA-1 digest stage.
    Digest {
        /// Input file path; reads stdin if omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file path for the raw digest bytes; writes stdout if
        /// omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
