// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Streaming digest transformer.
//!
//! Grounded on `crypto/transformation_hash.c`: `transform` absorbs
//! everything currently readable into the running hash state without
//! writing to `sink` (so `sink_min` is the full digest length, never
//! touched until `finalize`), and `finalize` writes the complete digest in
//! a single call.
//!
//! Generic over any [`digest::Digest`] implementation (plus `Clone`, so
//! `finalize` can snapshot the running hasher without consuming it) rather
//! than a fixed algorithm, so adding SHA-256 or another digest later is a
//! matter of instantiating `DigestTransformer::<Sha256>::new()`, not
//! touching the scheduler or this module.

use sha1::Digest;

use linepipe_core::{Buffer, Finalized, Result, Transformer};

/// Computes a running digest over everything that passes through,
/// appending the final digest to `sink` on `finalize`.
pub struct DigestTransformer<D: Digest + Clone> {
    hasher: D,
    finalized: bool,
}

impl<D: Digest + Clone> DigestTransformer<D> {
    pub fn new() -> Self {
        Self {
            hasher: D::new(),
            finalized: false,
        }
    }
}

impl<D: Digest + Clone> Default for DigestTransformer<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + Clone> Transformer for DigestTransformer<D> {
    fn source_min(&self) -> usize {
        1
    }

    fn sink_min(&self) -> usize {
        D::output_size()
    }

    fn transform(&mut self, source: &mut Buffer, _sink: &mut Buffer) -> Result<()> {
        let n = source.readable_len();
        self.hasher.update(source.read_slice());
        source.consume(n);
        Ok(())
    }

    fn finalize(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<Finalized> {
        if self.finalized {
            return Ok(Finalized::Done);
        }
        let n = source.readable_len();
        if n > 0 {
            self.hasher.update(source.read_slice());
            source.consume(n);
        }
        let out = self.hasher.clone().finalize();
        sink.write_slice()[..out.len()].copy_from_slice(&out);
        sink.append(out.len());
        self.finalized = true;
        Ok(Finalized::Done)
    }
}
