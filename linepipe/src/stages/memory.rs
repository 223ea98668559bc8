// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! In-memory chunk feeder and collector.
//!
//! Grounded on the reference `read_write/source_write.c` (a producer bound
//! to a fixed byte slice) and `read_write/sink_read.c` (a consumer bound to
//! a fixed byte slice). These are the adapters scenario 3's chunked-consumer
//! resumption test exercises: a fresh `SliceCollector` is bound via the
//! scheduler's `set_consumer` between `finalize` calls — exactly the mid-run
//! consumer replacement it supports. Collected output is reachable through a
//! shared `Rc<RefCell<Vec<u8>>>` handle taken before the collector is moved
//! into the scheduler, since the scheduler takes ownership of its consumer.

use std::cell::RefCell;
use std::rc::Rc;

use linepipe_core::{Buffer, Consumer, PipelineError, Producer, Result};

/// Feeds the bytes of an owned `Vec<u8>` into the pipeline, one write at a
/// time, then ends. Rebindable via [`SliceProducer::rebind`] to support
/// stream concatenation in `Work`.
pub struct SliceProducer {
    data: Vec<u8>,
    pos: usize,
}

impl SliceProducer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// Replaces the bound input, resetting the read position. Used to
    /// concatenate a new producer input mid-`Work`.
    pub fn rebind(&mut self, data: Vec<u8>) {
        self.data = data;
        self.pos = 0;
    }

    pub fn bytes_sent(&self) -> usize {
        self.pos
    }
}

impl Producer for SliceProducer {
    fn sink_min(&self) -> usize {
        1
    }

    fn end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn send(&mut self, sink: &mut Buffer) -> Result<()> {
        let n = sink.writable_len().min(self.data.len() - self.pos);
        if n == 0 {
            return Err(PipelineError::unexpected("send called with no room and no end"));
        }
        sink.write_slice()[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        sink.append(n);
        self.pos += n;
        Ok(())
    }
}

/// Collects pipeline output into a fixed-capacity shared buffer. `end()`
/// becomes true once the capacity is exhausted, modeling scenario 3's
/// bounded, chunk-at-a-time consumer. Output lives behind an
/// `Rc<RefCell<Vec<u8>>>` so a caller can keep a [`SliceCollector::handle`]
/// to read it after the collector itself has been moved into a scheduler.
pub struct SliceCollector {
    out: Rc<RefCell<Vec<u8>>>,
    cap: usize,
}

impl SliceCollector {
    pub fn new(cap: usize) -> Self {
        Self {
            out: Rc::new(RefCell::new(Vec::with_capacity(cap))),
            cap,
        }
    }

    /// A cloned handle to the shared output buffer, readable independently
    /// of the collector (which the scheduler owns once bound).
    pub fn handle(&self) -> Rc<RefCell<Vec<u8>>> {
        Rc::clone(&self.out)
    }
}

impl Consumer for SliceCollector {
    fn source_min(&self) -> usize {
        1
    }

    fn end(&self) -> bool {
        self.out.borrow().len() >= self.cap
    }

    fn send(&mut self, source: &mut Buffer) -> Result<()> {
        let mut out = self.out.borrow_mut();
        let n = source.readable_len().min(self.cap - out.len());
        if n == 0 {
            return Err(PipelineError::unexpected("send called with no room and no end"));
        }
        out.extend_from_slice(&source.read_slice()[..n]);
        source.consume(n);
        Ok(())
    }
}
