// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Streaming base64 encode/decode transformers.
//!
//! Both stages work in fixed-size groups so that `transform` never needs to
//! reason about partial trailing data: encoding consumes exactly 48 raw
//! bytes and produces exactly 64 encoded bytes per call; decoding consumes
//! exactly 64 encoded bytes and produces up to 48 raw bytes. The leftover
//! tail below a full group (1-47 bytes for the encoder, 1-63 for the
//! decoder) is only ever handled in `finalize`, which mirrors the reference
//! C transformer (`encode/transformation_b64_encode.c`,
//! `encode/transformation_b64_decode.c`) rather than a more "obvious"
//! buffering design that would absorb remainders a byte at a time.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use linepipe_core::{Buffer, Finalized, PipelineError, Result, Transformer};

const GROUP_RAW: usize = 48;
const GROUP_ENCODED: usize = 64;

/// Encodes raw bytes to base64, 48 bytes in / 64 bytes out per full group.
pub struct Base64Encoder;

impl Base64Encoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Base64Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for Base64Encoder {
    fn source_min(&self) -> usize {
        GROUP_RAW
    }

    /// 64 bytes of encoded block plus one spare byte, matching the
    /// reference implementation's allowance for a NUL terminator it never
    /// actually needs to write here.
    fn sink_min(&self) -> usize {
        GROUP_ENCODED + 1
    }

    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        let written = STANDARD
            .encode_slice(&source.read_slice()[..GROUP_RAW], sink.write_slice())
            .map_err(|e| PipelineError::unexpected(format!("base64 encode: {e}")))?;
        debug_assert_eq!(written, GROUP_ENCODED);
        source.consume(GROUP_RAW);
        sink.append(written);
        Ok(())
    }

    fn finalize(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<Finalized> {
        let left = source.readable_len();
        if left > 0 {
            let written = STANDARD
                .encode_slice(&source.read_slice()[..left], sink.write_slice())
                .map_err(|e| PipelineError::unexpected(format!("base64 encode (tail): {e}")))?;
            source.consume(left);
            sink.append(written);
        }
        Ok(Finalized::Done)
    }
}

/// Decodes base64 to raw bytes, 64 bytes in / up to 48 bytes out per full
/// group.
pub struct Base64Decoder;

impl Base64Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Base64Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for Base64Decoder {
    fn source_min(&self) -> usize {
        GROUP_ENCODED
    }

    fn sink_min(&self) -> usize {
        GROUP_RAW
    }

    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        let group = &source.read_slice()[..GROUP_ENCODED];
        let written = STANDARD.decode_slice(group, sink.write_slice()).map_err(|e| {
            PipelineError::protocol(format!(
                "failed to decode base64 block (may be caused by spaces or newlines in input): {e}"
            ))
        })?;
        source.consume(GROUP_ENCODED);
        sink.append(written);
        Ok(())
    }

    fn finalize(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<Finalized> {
        let left = source.readable_len();
        if left > 0 {
            let group = &source.read_slice()[..left];
            let written = STANDARD.decode_slice(group, sink.write_slice()).map_err(|e| {
                PipelineError::protocol(format!(
                    "failed to decode base64 tail (may be caused by spaces or newlines in input): {e}"
                ))
            })?;
            source.consume(left);
            sink.append(written);
        }
        Ok(Finalized::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_through(mut t: impl Transformer, input: &[u8], cap: usize) -> Vec<u8> {
        let mut source = Buffer::create(cap).unwrap();
        let mut sink = Buffer::create(cap).unwrap();
        let n = input.len().min(source.writable_len());
        source.write_slice()[..n].copy_from_slice(&input[..n]);
        source.append(n);
        let mut out = Vec::new();
        while source.readable_len() >= t.source_min() && sink.writable_len() >= t.sink_min() {
            t.transform(&mut source, &mut sink).unwrap();
            out.extend_from_slice(sink.read_slice());
            sink.consume(sink.readable_len());
        }
        loop {
            let done = t.finalize(&mut source, &mut sink).unwrap();
            out.extend_from_slice(sink.read_slice());
            sink.consume(sink.readable_len());
            if done.is_done() {
                break;
            }
        }
        out
    }

    #[test]
    fn encode_round_trips_through_decode() {
        let input: Vec<u8> = (0..200u16).map(|x| (x % 256) as u8).collect();
        let encoded = run_through(Base64Encoder::new(), &input, 1024);
        let decoded = run_through(Base64Decoder::new(), &encoded, 1024);
        assert_eq!(decoded, input);
    }

    #[test]
    fn encode_matches_known_vector() {
        let out = run_through(Base64Encoder::new(), b"hello, world", 256);
        assert_eq!(out, b"aGVsbG8sIHdvcmxk");
    }

    #[test]
    fn decode_handles_padding() {
        let out = run_through(Base64Decoder::new(), b"aGVsbG8sIHdvcmxk", 256);
        assert_eq!(out, b"hello, world");
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert!(run_through(Base64Encoder::new(), b"", 256).is_empty());
        assert!(run_through(Base64Decoder::new(), b"", 256).is_empty());
    }
}
