// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Bootstrap-phase logging: a `tracing-subscriber` `fmt` layer driven by
//! `RUST_LOG`, falling back to a verbosity derived from `--verbose` or a
//! config file's `log_level`.
//!
//! Grounded on the teacher's `adaptive_pipeline_bootstrap/src/logger.rs`
//! approach of a single composition-root init call; this crate has no
//! separate bootstrap-vs-application logging split since there is no
//! enterprise layer distinction to keep apart.

use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber. Call once, before anything
/// else logs.
///
/// Precedence, highest first: `RUST_LOG` (if set) > `--verbose` (forces
/// `debug`) > `config_level` (the config file's `log_level`, if any) >
/// `info`.
pub fn init(verbose: bool, config_level: Option<&str>) {
    let default_level = if verbose {
        "debug"
    } else {
        config_level.unwrap_or("info")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
