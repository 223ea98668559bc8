// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Line-at-a-time and byte-at-a-time consumers.
//!
//! Grounded on `read_write/sink_gets.c` and `read_write/sink_getc.c`. Both
//! are `Consumer`s rather than producers in the reference: they capture
//! pipeline *output* into a caller-visible result one line, or one byte, at
//! a time, then report `end()`. Rebinding ([`LineConsumer::rebind`],
//! [`ByteConsumer::rebind`]) resets that per-call state so the same
//! instance can be reused for the next line/byte without constructing a new
//! one.

use linepipe_core::{Buffer, Consumer, Result};

/// Captures pipeline output up to and including the next `\n`, or until an
/// internal cap is reached, whichever comes first.
pub struct LineConsumer {
    line: Vec<u8>,
    cap: usize,
    done: bool,
}

impl LineConsumer {
    /// `cap` mirrors the reference's `sink_gets_set(s, size, ...)` buffer
    /// size: at most `cap` bytes are captured for a single line.
    pub fn new(cap: usize) -> Self {
        Self {
            line: Vec::new(),
            cap,
            done: false,
        }
    }

    /// Resets capture state to start reading the next line.
    pub fn rebind(&mut self) {
        self.line.clear();
        self.done = false;
    }

    /// The captured line so far, including its trailing `\n` if one was
    /// found. `None` if nothing has been captured yet (mirrors
    /// `sink_gets_get_result` returning `NULL` when `cnt == 0`).
    pub fn line(&self) -> Option<&[u8]> {
        if self.line.is_empty() {
            None
        } else {
            Some(&self.line)
        }
    }
}

impl Consumer for LineConsumer {
    fn source_min(&self) -> usize {
        1
    }

    fn end(&self) -> bool {
        self.done
    }

    fn send(&mut self, source: &mut Buffer) -> Result<()> {
        let avail = source.readable_len();
        let room = self.cap - self.line.len();
        let want = avail.min(room);
        let data = &source.read_slice()[..want];
        let newline_at = data.iter().position(|&b| b == b'\n');
        let take = newline_at.map(|i| i + 1).unwrap_or(want);
        self.line.extend_from_slice(&data[..take]);
        source.consume(take);
        if newline_at.is_some() || self.line.len() == self.cap {
            self.done = true;
        }
        Ok(())
    }
}

/// Captures exactly one byte of pipeline output, then ends.
pub struct ByteConsumer {
    byte: Option<u8>,
}

impl ByteConsumer {
    pub fn new() -> Self {
        Self { byte: None }
    }

    /// Resets capture state to read the next byte.
    pub fn rebind(&mut self) {
        self.byte = None;
    }

    /// The captured byte, or `None` (`EOF` in the reference) if `send` has
    /// not yet been called since construction or the last rebind.
    pub fn byte(&self) -> Option<u8> {
        self.byte
    }
}

impl Default for ByteConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl Consumer for ByteConsumer {
    fn source_min(&self) -> usize {
        1
    }

    fn end(&self) -> bool {
        self.byte.is_some()
    }

    fn send(&mut self, source: &mut Buffer) -> Result<()> {
        self.byte = Some(source.read_slice()[0]);
        source.consume(1);
        Ok(())
    }
}
