// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Byte-set filtering transformers: remove and replace.
//!
//! Grounded on `util/transformation_remove.c` and `util/transformation_replace.c`:
//! a 256-bit membership mask over byte values, one byte processed per call.
//! Both report `source_min = sink_min = 1` and finalize immediately (there
//! is no internal state to flush).

use linepipe_core::{Buffer, Finalized, Result, Transformer};

/// A 256-bit set of byte values, matching the reference's `mask[32]`
/// bitset.
#[derive(Clone, Copy)]
struct ByteMask([u8; 32]);

impl ByteMask {
    fn from_bytes(symbols: &[u8]) -> Self {
        let mut mask = [0u8; 32];
        for &b in symbols {
            mask[(b / 8) as usize] |= 1 << (b % 8);
        }
        Self(mask)
    }

    fn contains(&self, b: u8) -> bool {
        self.0[(b / 8) as usize] & (1 << (b % 8)) != 0
    }
}

/// Drops every byte in a fixed set, passing everything else through
/// unchanged.
pub struct RemoveFilter {
    mask: ByteMask,
}

impl RemoveFilter {
    pub fn new(symbols: &[u8]) -> Self {
        Self {
            mask: ByteMask::from_bytes(symbols),
        }
    }
}

impl Transformer for RemoveFilter {
    fn source_min(&self) -> usize {
        1
    }

    fn sink_min(&self) -> usize {
        1
    }

    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        let byte = source.read_slice()[0];
        source.consume(1);
        if !self.mask.contains(byte) {
            sink.write_slice()[0] = byte;
            sink.append(1);
        }
        Ok(())
    }

    fn finalize(&mut self, _source: &mut Buffer, _sink: &mut Buffer) -> Result<Finalized> {
        Ok(Finalized::Done)
    }
}

/// Substitutes every byte in a fixed set with a single replacement byte,
/// passing everything else through unchanged.
pub struct ReplaceFilter {
    mask: ByteMask,
    replace: u8,
}

impl ReplaceFilter {
    pub fn new(symbols: &[u8], replace: u8) -> Self {
        Self {
            mask: ByteMask::from_bytes(symbols),
            replace,
        }
    }
}

impl Transformer for ReplaceFilter {
    fn source_min(&self) -> usize {
        1
    }

    fn sink_min(&self) -> usize {
        1
    }

    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        let byte = source.read_slice()[0];
        source.consume(1);
        sink.write_slice()[0] = if self.mask.contains(byte) { self.replace } else { byte };
        sink.append(1);
        Ok(())
    }

    fn finalize(&mut self, _source: &mut Buffer, _sink: &mut Buffer) -> Result<Finalized> {
        Ok(Finalized::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_through(mut t: impl Transformer, input: &[u8]) -> Vec<u8> {
        let mut source = Buffer::create(256).unwrap();
        let mut sink = Buffer::create(256).unwrap();
        source.write_slice()[..input.len()].copy_from_slice(input);
        source.append(input.len());
        while source.readable_len() >= t.source_min() {
            t.transform(&mut source, &mut sink).unwrap();
        }
        loop {
            if t.finalize(&mut source, &mut sink).unwrap().is_done() {
                break;
            }
        }
        sink.read_slice().to_vec()
    }

    #[test]
    fn remove_drops_matching_bytes() {
        let out = run_through(RemoveFilter::new(b"027"), b"0123456789");
        // 0, 2, 7 removed from "0123456789" => "1345689"
        assert_eq!(out, b"1345689");
    }

    #[test]
    fn replace_substitutes_matching_bytes() {
        let out = run_through(ReplaceFilter::new(b"aeiou", b'_'), b"hello world");
        assert_eq!(out, b"h_ll_ w_rld");
    }

    #[test]
    fn scenario_six_remove_mask() {
        let mut input = Vec::new();
        for range in [b'0'..=b'9', b'a'..=b'f'] {
            for _ in 0..16 {
                input.extend(range.clone());
            }
        }
        input.extend_from_slice(b"fffffff");
        input.push(0);
        assert_eq!(input.len(), 264);

        let out = run_through(RemoveFilter::new(b"0267"), &input);
        assert_eq!(out.len(), 200);
        assert!(!out.contains(&b'0'));
        assert!(!out.contains(&b'2'));
        assert!(!out.contains(&b'6'));
        assert!(!out.contains(&b'7'));
    }
}
