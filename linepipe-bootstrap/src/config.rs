// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Optional TOML recipe defaults, loaded with `--config <file>`.
//!
//! Scaled down from the teacher's `infrastructure/config.rs` /
//! `config_service.rs` (which layers CLI args, environment variables, and a
//! SQLite-backed pipeline repository): this crate has no persistence layer,
//! so a config file is nothing more than a handful of defaults a recipe can
//! fall back to when the corresponding `--stage` argument or flag is
//! omitted.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use linepipe_core::{PipelineError, Result};

/// Recipe defaults loadable from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Default log level (`"error"`, `"warn"`, `"info"`, `"debug"`,
    /// `"trace"`), used by [`crate::logger::init`] when neither `RUST_LOG`
    /// nor `--verbose` is given.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Default passphrase for `encrypt`/`decrypt` stages invoked without an
    /// explicit `:passphrase` argument, read from the named environment
    /// variable rather than stored in the file directly.
    #[serde(default)]
    pub passphrase_env: Option<String>,

    /// Default deflate compression level (0-9) for a `deflate` stage
    /// invoked without an explicit `:level` argument.
    #[serde(default)]
    pub deflate_level: Option<u32>,
}

impl Config {
    /// Parses a TOML config file. A missing file is not an error at this
    /// layer — callers treat `--config` as optional and only call this
    /// when the flag was given.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| PipelineError::invalid_argument(format!("invalid config file {}: {e}", path.display())))
    }

    /// Resolves the passphrase for a stage that didn't get one on the
    /// command line, via `passphrase_env`.
    pub fn resolve_passphrase(&self) -> Result<String> {
        let var = self
            .passphrase_env
            .as_deref()
            .ok_or_else(|| PipelineError::invalid_argument("no passphrase given and no passphrase_env configured"))?;
        std::env::var(var)
            .map_err(|_| PipelineError::invalid_argument(format!("environment variable {var} is not set")))
    }
}
