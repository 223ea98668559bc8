// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Assembles a [`Scheduler`] from an ordered list of named transformer
//! stages.
//!
//! This is the application layer's single use case: given a producer, a
//! consumer, and a recipe described as data (rather than code wiring up
//! `Box<dyn Transformer>`s by hand), build a ready-to-run pipeline and drive
//! it to completion. Grounded on the shape of the teacher's
//! `application/use_cases/process_file.rs` (a use case that loads a named
//! pipeline configuration and executes it end-to-end), scaled down to this
//! crate's much smaller surface: no database-backed pipeline repository, no
//! adaptive chunk/worker sizing, no metrics collection — just a stage list
//! and a scheduler.

use tracing::debug;

use linepipe_core::{Consumer, PipelineError, Producer, Result, Scheduler, SchedulerStage, Transformer};

use crate::stages::{
    Base64Decoder, Base64Encoder, DecryptTransformer, DeflateTransformer, DigestTransformer,
    EncryptTransformer, InflateTransformer, RemoveFilter, ReplaceFilter,
};

/// One named stage in a recipe, in the shape a CLI's repeated `--stage`
/// flag naturally produces.
#[derive(Debug, Clone)]
pub enum StageSpec {
    Base64Encode,
    Base64Decode,
    Deflate { level: u32 },
    Inflate,
    Encrypt { passphrase: String },
    Decrypt { passphrase: String },
    Sha1Digest,
    RemoveBytes { symbols: Vec<u8> },
    ReplaceBytes { symbols: Vec<u8>, replacement: u8 },
}

impl StageSpec {
    fn build(&self) -> Result<Box<dyn Transformer>> {
        Ok(match self {
            StageSpec::Base64Encode => Box::new(Base64Encoder::new()),
            StageSpec::Base64Decode => Box::new(Base64Decoder::new()),
            StageSpec::Deflate { level } => Box::new(DeflateTransformer::new(*level)),
            StageSpec::Inflate => Box::new(InflateTransformer::new()),
            StageSpec::Encrypt { passphrase } => Box::new(EncryptTransformer::new(passphrase)?),
            StageSpec::Decrypt { passphrase } => Box::new(DecryptTransformer::new(passphrase)?),
            StageSpec::Sha1Digest => Box::new(DigestTransformer::<sha1::Sha1>::new()),
            StageSpec::RemoveBytes { symbols } => Box::new(RemoveFilter::new(symbols)),
            StageSpec::ReplaceBytes { symbols, replacement } => {
                Box::new(ReplaceFilter::new(symbols, *replacement))
            }
        })
    }

    /// Parses the CLI-facing name used by `--stage <name>`, e.g.
    /// `base64-encode`, `deflate:6`, `encrypt:<passphrase>`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, arg) = match spec.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (spec, None),
        };
        let require_arg = |what: &str| -> Result<&str> {
            arg.ok_or_else(|| PipelineError::invalid_argument(format!("stage '{name}' requires a {what}")))
        };
        Ok(match name {
            "base64-encode" => StageSpec::Base64Encode,
            "base64-decode" => StageSpec::Base64Decode,
            "deflate" => StageSpec::Deflate {
                level: match arg {
                    Some(level) => level
                        .parse()
                        .map_err(|_| PipelineError::invalid_argument(format!("bad deflate level: {level}")))?,
                    None => 6,
                },
            },
            "inflate" => StageSpec::Inflate,
            "encrypt" => StageSpec::Encrypt {
                passphrase: require_arg("passphrase")?.to_string(),
            },
            "decrypt" => StageSpec::Decrypt {
                passphrase: require_arg("passphrase")?.to_string(),
            },
            "digest" => StageSpec::Sha1Digest,
            "remove" => StageSpec::RemoveBytes {
                symbols: require_arg("byte set")?.as_bytes().to_vec(),
            },
            "replace" => {
                let arg = require_arg("symbols=replacement argument")?;
                let (symbols, replacement) = arg
                    .split_once('=')
                    .ok_or_else(|| PipelineError::invalid_argument("replace stage needs 'symbols=X'"))?;
                let replacement = replacement
                    .bytes()
                    .next()
                    .ok_or_else(|| PipelineError::invalid_argument("replace stage needs a replacement byte"))?;
                StageSpec::ReplaceBytes {
                    symbols: symbols.as_bytes().to_vec(),
                    replacement,
                }
            }
            other => return Err(PipelineError::invalid_argument(format!("unknown stage: {other}"))),
        })
    }
}

/// Builds a scheduler in the `Build` stage from a producer, a consumer, and
/// an ordered recipe of transformer stages.
pub fn build_pipeline(
    producer: Box<dyn Producer>,
    consumer: Box<dyn Consumer>,
    recipe: &[StageSpec],
) -> Result<Scheduler> {
    let mut scheduler = Scheduler::new(producer, consumer)?;
    for spec in recipe {
        debug!(stage = ?spec, "adding stage to pipeline");
        scheduler.add_transformer(spec.build()?)?;
    }
    Ok(scheduler)
}

/// Drives a scheduler from `Build` all the way to `Done`, calling `finalize`
/// repeatedly the way a caller must per the scheduler's multi-call
/// finalization handshake.
pub fn run_to_completion(scheduler: &mut Scheduler) -> Result<()> {
    while scheduler.stage() != SchedulerStage::Done {
        scheduler.finalize()?;
    }
    Ok(())
}
