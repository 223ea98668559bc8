// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Entry point: parses the CLI, wires a pipeline from the requested
//! recipe, drives it to completion, and maps the result onto a process
//! exit code.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error};

use linepipe::stages::{FileConsumer, FileProducer};
use linepipe::StageSpec;
use linepipe_core::{Consumer, PipelineError, Producer, Result};

use linepipe_bootstrap::{Cli, Command, Config, ExitCode};

fn open_producer(input: Option<&PathBuf>) -> Result<Box<dyn Producer>> {
    match input {
        Some(path) => Ok(Box::new(FileProducer::open(path)?)),
        None => Ok(Box::new(FileProducer::new(Box::new(io::stdin())))),
    }
}

fn open_consumer(output: Option<&PathBuf>) -> Result<Box<dyn Consumer>> {
    match output {
        Some(path) => Ok(Box::new(FileConsumer::create(path)?)),
        None => Ok(Box::new(FileConsumer::new(Box::new(io::stdout())))),
    }
}

/// Fills in a bare stage name (no `:argument`) from the config file's
/// defaults: `encrypt`/`decrypt` from `passphrase_env`, `deflate` from
/// `deflate_level`.
fn resolve_stage_arg(raw: &str, config: &Config) -> Result<String> {
    let bare_cipher = raw == "encrypt" || raw == "decrypt";
    if bare_cipher {
        let passphrase = config.resolve_passphrase()?;
        return Ok(format!("{raw}:{passphrase}"));
    }
    if raw == "deflate" {
        if let Some(level) = config.deflate_level {
            return Ok(format!("deflate:{level}"));
        }
    }
    Ok(raw.to_string())
}

fn build_recipe(raw_stages: &[String], config: &Config) -> Result<Vec<StageSpec>> {
    raw_stages
        .iter()
        .map(|raw| StageSpec::parse(&resolve_stage_arg(raw, config)?))
        .collect()
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Command::Run { input, output, stages } => {
            let producer = open_producer(input.as_ref())?;
            let consumer = open_consumer(output.as_ref())?;
            let recipe = build_recipe(stages, config)?;
            debug!(stages = stages.len(), "assembling pipeline");
            let mut scheduler = linepipe::build_pipeline(producer, consumer, &recipe)?;
            linepipe::run_to_completion(&mut scheduler)?;
        }
        Command::Digest { input, output } => {
            let producer = open_producer(input.as_ref())?;
            let consumer = open_consumer(output.as_ref())?;
            let recipe = vec![StageSpec::Sha1Digest];
            let mut scheduler = linepipe::build_pipeline(producer, consumer, &recipe)?;
            linepipe::run_to_completion(&mut scheduler)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Config has to load before the logger so a configured `log_level` can
    // feed into it; a load failure is reported directly since nothing has
    // initialized tracing yet.
    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load config file {}: {e}", path.display());
                std::process::exit(ExitCode::from_pipeline_error(&e).as_i32());
            }
        },
        None => Config::default(),
    };

    linepipe_bootstrap::logger::init(cli.verbose, config.log_level.as_deref());

    if let Err(e) = run(&cli, &config) {
        error!("{e}");
        std::process::exit(ExitCode::from_pipeline_error(&e).as_i32());
    }
}
