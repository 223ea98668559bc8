// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Byte staging between adjacent pipeline stages.
//!
//! A [`Buffer`] is a fixed-capacity byte region with two independent
//! cursors: `rpos` (read) and `wpos` (write), always satisfying
//! `0 <= rpos <= wpos <= size`. Producers and transformers append at
//! `wpos`; transformers and consumers consume at `rpos`. The scheduler is
//! the only thing that ever resizes or compacts a buffer; stage adapters
//! only ever see cursor-scoped slices.

use crate::error::{PipelineError, Result};

/// A contiguous byte region with independent read and write cursors.
pub struct Buffer {
    buf: Vec<u8>,
    rpos: usize,
    wpos: usize,
}

impl Buffer {
    /// Creates an empty buffer of the given capacity.
    ///
    /// `cap` must be at least 1; allocation failure surfaces as
    /// [`PipelineError::OutOfMemory`] (in practice `Vec` aborts the process
    /// on allocation failure, but the fallible signature matches the
    /// contract and the future possibility of a custom allocator).
    pub fn create(cap: usize) -> Result<Self> {
        if cap == 0 {
            return Err(PipelineError::invalid_argument("buffer capacity must be >= 1"));
        }
        Ok(Self {
            buf: vec![0u8; cap],
            rpos: 0,
            wpos: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.buf.len()
    }

    pub fn readable_len(&self) -> usize {
        self.wpos - self.rpos
    }

    pub fn writable_len(&self) -> usize {
        self.buf.len() - self.wpos
    }

    pub fn occupied_len(&self) -> usize {
        self.wpos
    }

    /// Immutable view over `[rpos, wpos)`.
    pub fn read_slice(&self) -> &[u8] {
        &self.buf[self.rpos..self.wpos]
    }

    /// Mutable view over `[wpos, size)`.
    pub fn write_slice(&mut self) -> &mut [u8] {
        &mut self.buf[self.wpos..]
    }

    /// Advances the read cursor by `n`. Panics if `n > readable_len()` — a
    /// caller violating this has already broken the stage contract.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.readable_len(), "consume past wpos");
        self.rpos += n;
    }

    /// Advances the write cursor by `n`. Panics if `n > writable_len()`.
    pub fn append(&mut self, n: usize) {
        assert!(n <= self.writable_len(), "append past size");
        self.wpos += n;
    }

    pub fn reset(&mut self) {
        self.rpos = 0;
        self.wpos = 0;
    }

    /// Reallocates the backing storage to `new_cap`. If the new capacity
    /// truncates occupied data, `wpos` (and `rpos`, if it now exceeds
    /// `wpos`) are clamped down rather than left dangling. The caller is
    /// responsible for checking `occupied_len()` first if data loss is
    /// unacceptable.
    pub fn resize(&mut self, new_cap: usize) -> Result<()> {
        if new_cap == 0 {
            return Err(PipelineError::invalid_argument("buffer capacity must be >= 1"));
        }
        self.buf.resize(new_cap, 0);
        if self.wpos > new_cap {
            self.wpos = new_cap;
        }
        if self.rpos > self.wpos {
            self.rpos = self.wpos;
        }
        Ok(())
    }

    /// Shifts unread bytes to offset 0 and resets `rpos` to 0. A no-op if
    /// `rpos` is already 0.
    pub fn compact(&mut self) {
        if self.rpos == 0 {
            return;
        }
        self.buf.copy_within(self.rpos..self.wpos, 0);
        self.wpos -= self.rpos;
        self.rpos = 0;
    }
}
