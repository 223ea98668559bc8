// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The three polymorphic stage roles: [`Producer`], [`Transformer`], and
//! [`Consumer`].
//!
//! Each role is a small trait rather than a base-struct-plus-vtable the way
//! the C reference implementation expresses it (`source_call_tab`,
//! `sink_call_tab`, a `transformation_call_tab` of function pointers) — the
//! scheduler holds `Box<dyn Trait>` values instead of raw back-pointers into
//! its own buffers, so roles never need a pointer to "their" buffer; the
//! scheduler hands them a buffer view at the start of every step instead.

use crate::buffer::Buffer;
use crate::error::Result;

/// Whether a transformer's `finalize` step has fully flushed its internal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalized {
    Done,
    NotDone,
}

impl Finalized {
    pub fn is_done(self) -> bool {
        matches!(self, Finalized::Done)
    }
}

/// A data source at the head of a pipeline.
///
/// `sink_min` must return the same positive value for the lifetime of a
/// configured producer; it may only change as a side effect of a
/// role-specific reconfiguration operation (e.g. rebinding to new input),
/// never as a side effect of `send`.
pub trait Producer {
    /// Minimum writable bytes required in the sink buffer before `send` may
    /// be called. Always > 0.
    fn sink_min(&self) -> usize;

    /// True once this producer is exhausted and will never advance `sink`
    /// again.
    fn end(&self) -> bool;

    /// Writes at least one byte into `sink`, advancing its write cursor.
    /// Precondition: `!self.end()` and `sink.writable_len() >=
    /// self.sink_min()`.
    fn send(&mut self, sink: &mut Buffer) -> Result<()>;
}

/// A data sink at the tail of a pipeline.
pub trait Consumer {
    /// Minimum readable bytes required in the source buffer before `send`
    /// may be called. Always > 0.
    fn source_min(&self) -> usize;

    /// True once this consumer will accept no more bytes.
    fn end(&self) -> bool;

    /// Reads at least one byte from `source`, advancing its read cursor.
    /// Precondition: `!self.end()` and `source.readable_len() >=
    /// self.source_min()`.
    fn send(&mut self, source: &mut Buffer) -> Result<()>;
}

/// An in-order data transformer between a producer (or upstream
/// transformer) and a consumer (or downstream transformer).
pub trait Transformer {
    /// Minimum readable bytes required in `source` before `transform` may
    /// be called. Always > 0.
    fn source_min(&self) -> usize;

    /// Minimum writable bytes required in `sink` before `transform` (or
    /// `finalize`) may be called. Always > 0.
    fn sink_min(&self) -> usize;

    /// Consumes from `source` and/or produces into `sink`, advancing at
    /// least one of the two cursors. Precondition: `source.readable_len()
    /// >= self.source_min()` and `sink.writable_len() >= self.sink_min()`,
    /// and `finalize` has not yet been called on this instance.
    fn transform(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<()>;

    /// Flushes any transformer-internal state into `sink`. Precondition:
    /// `source.readable_len() < self.source_min()` and
    /// `sink.writable_len() >= self.sink_min()`. Invoked repeatedly (with
    /// no other operations in between) until it reports [`Finalized::Done`]
    /// — every implementation must guarantee this terminates.
    fn finalize(&mut self, source: &mut Buffer, sink: &mut Buffer) -> Result<Finalized>;
}
