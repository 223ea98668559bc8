// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Streaming deflate/inflate transformers.
//!
//! Grounded on `compress/transformation_compress.c` and
//! `transformation_decompress.c`: both report `source_min = sink_min =
//! DATA_MIN (2048)` so that a single `transform` call always has enough
//! room to make progress on a real zlib stream, and both drive
//! `flate2::Compress`/`Decompress` (zlib-header-less, matching the
//! reference) with `Flush::None` during `transform` and `Flush::Finish`
//! during `finalize`, repeated until the stream reports completion.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use linepipe_core::{Buffer, Finalized, PipelineError, Result, Transformer};

const DATA_MIN: usize = 2048;

/// Compresses a byte stream with DEFLATE.
pub struct DeflateTransformer {
    stream: Compress,
}

impl DeflateTransformer {
    pub fn new(level: u32) -> Self {
        Self {
            stream: Compress::new(Compression::new(level), false),
        }
    }
}

impl Transformer for DeflateTransformer {
    fn source_min(&self) -> usize {
        DATA_MIN
    }

    fn sink_min(&self) -> usize {
        DATA_MIN
    }

    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        let before_in = self.stream.total_in();
        let before_out = self.stream.total_out();
        let status = self
            .stream
            .compress(source.read_slice(), sink.write_slice(), FlushCompress::None)
            .map_err(|e| PipelineError::unexpected(format!("deflate: {e}")))?;
        let consumed = (self.stream.total_in() - before_in) as usize;
        let produced = (self.stream.total_out() - before_out) as usize;
        source.consume(consumed);
        sink.append(produced);
        if status == Status::BufError && consumed == 0 && produced == 0 {
            return Err(PipelineError::unexpected("deflate made no progress"));
        }
        Ok(())
    }

    fn finalize(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<Finalized> {
        let before_in = self.stream.total_in();
        let before_out = self.stream.total_out();
        let status = self
            .stream
            .compress(source.read_slice(), sink.write_slice(), FlushCompress::Finish)
            .map_err(|e| PipelineError::unexpected(format!("deflate finalize: {e}")))?;
        let consumed = (self.stream.total_in() - before_in) as usize;
        let produced = (self.stream.total_out() - before_out) as usize;
        source.consume(consumed);
        sink.append(produced);
        if status == Status::StreamEnd {
            Ok(Finalized::Done)
        } else {
            Ok(Finalized::NotDone)
        }
    }
}

/// Decompresses a DEFLATE stream produced by [`DeflateTransformer`].
pub struct InflateTransformer {
    stream: Decompress,
    finished: bool,
}

impl InflateTransformer {
    pub fn new() -> Self {
        Self {
            stream: Decompress::new(false),
            finished: false,
        }
    }
}

impl Default for InflateTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl InflateTransformer {
    fn do_decompress(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        if self.finished {
            // Mirrors the reference: once the stream has ended, silently
            // discard whatever trailing bytes still show up.
            let n = source.readable_len();
            source.consume(n);
            return Ok(());
        }
        let before_in = self.stream.total_in();
        let before_out = self.stream.total_out();
        let status = self
            .stream
            .decompress(source.read_slice(), sink.write_slice(), FlushDecompress::None)
            .map_err(|e| PipelineError::protocol(format!("inflate: {e}")))?;
        let consumed = (self.stream.total_in() - before_in) as usize;
        let produced = (self.stream.total_out() - before_out) as usize;
        source.consume(consumed);
        sink.append(produced);
        if status == Status::StreamEnd {
            self.finished = true;
        }
        Ok(())
    }
}

impl Transformer for InflateTransformer {
    fn source_min(&self) -> usize {
        DATA_MIN
    }

    fn sink_min(&self) -> usize {
        DATA_MIN
    }

    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()> {
        self.do_decompress(source, sink)
    }

    fn finalize(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<Finalized> {
        self.do_decompress(source, sink)?;
        Ok(if self.finished { Finalized::Done } else { Finalized::NotDone })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_through(mut t: impl Transformer, input: &[u8]) -> Vec<u8> {
        let mut source = Buffer::create(DATA_MIN * 4).unwrap();
        let mut sink = Buffer::create(DATA_MIN * 4).unwrap();
        let n = input.len().min(source.writable_len());
        source.write_slice()[..n].copy_from_slice(&input[..n]);
        source.append(n);
        let mut out = Vec::new();
        loop {
            while source.readable_len() >= t.source_min() && sink.writable_len() >= t.sink_min() {
                t.transform(&mut source, &mut sink).unwrap();
                out.extend_from_slice(sink.read_slice());
                sink.consume(sink.readable_len());
            }
            if source.readable_len() < t.source_min() {
                break;
            }
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
    fn deflate_inflate_round_trips() {
        let input: Vec<u8> = (0..10_000u32).map(|x| (x % 251) as u8).collect();
        let compressed = run_through(DeflateTransformer::new(6), &input);
        assert!(compressed.len() < input.len());
        let decompressed = run_through(InflateTransformer::new(), &compressed);
        assert_eq!(decompressed, input);
    }

    #[test]
    fn empty_input_round_trips() {
        let compressed = run_through(DeflateTransformer::new(6), &[]);
        let decompressed = run_through(InflateTransformer::new(), &compressed);
        assert!(decompressed.is_empty());
    }
}
