// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The pipeline scheduler: owns the buffer/transformer graph and drives it
//! through `Build -> Work -> Final -> Done`.
//!
//! This is a close port of the reference scheduler (`controller.c` in the
//! CTransform C library this system was distilled from): the same buffer
//! sizing hysteresis, the same work-cycle shape (compact, drain producer,
//! advance transformers left to right, drain to consumer), and the same
//! multi-call finalize handshake that lets a caller swap in fresh consumers
//! to collect output in chunks.
//!
//! Where the reference implementation is a doubly-alternating linked list of
//! buffer/transformer nodes with roles holding raw pointers back into the
//! scheduler's buffers, this implementation models the graph as a flat
//! `Vec<Buffer>` of length `n+1` alongside a `Vec<Box<dyn Transformer>>` of
//! length `n`, and hands each role the buffer(s) it needs as plain
//! arguments at the point of the call rather than storing the wiring
//! permanently inside the role. That removes the back-reference/lifetime
//! problem the C version works around with raw pointers, without changing
//! observable behavior.
//!
//! Role objects are supplied by value (`Box<dyn Producer>` etc.) rather than
//! the non-owning references the original specifies: Rust's ownership model
//! already gives every value a single owner, so there is nothing for the
//! scheduler to "merely reference" the way a C controller does with raw
//! pointers it never frees. Replacing a role (`set_producer`/`set_consumer`)
//! simply drops the old one, which is what the equivalent C call site does
//! with the role it no longer holds a pointer to.

use std::ops::Range;

use tracing::{debug, trace};

use crate::buffer::Buffer;
use crate::error::{PipelineError, Result};
use crate::stage::{Consumer, Finalized, Producer, Transformer};

/// Minimum buffer capacity the sizing policy will ever choose.
pub const MIN_BUF: usize = 4096;

/// The scheduler's monotonic stage machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchedulerStage {
    Build,
    Work,
    Final,
    Done,
}

/// Owns the pipeline graph (producer, transformers, internal buffers,
/// consumer) and drives bytes from producer to consumer.
pub struct Scheduler {
    producer: Box<dyn Producer>,
    consumer: Box<dyn Consumer>,
    transformers: Vec<Box<dyn Transformer>>,
    /// `buffers.len() == transformers.len() + 1`.
    buffers: Vec<Buffer>,
    stage: SchedulerStage,
    /// `None` until finalize has run its first work cycle and the producer
    /// reached end; afterwards, the index of the first buffer whose
    /// upstream transformer has not yet reported fully flushed. Equal to
    /// `transformers.len()` once every transformer is finalized.
    fin_cursor: Option<usize>,
}

impl Scheduler {
    /// Creates a new scheduler in the `Build` stage with no transformers:
    /// `Producer -> B0 -> Consumer`.
    pub fn new(producer: Box<dyn Producer>, consumer: Box<dyn Consumer>) -> Result<Self> {
        Ok(Self {
            producer,
            consumer,
            transformers: Vec::new(),
            buffers: vec![Buffer::create(MIN_BUF)?],
            stage: SchedulerStage::Build,
            fin_cursor: None,
        })
    }

    pub fn stage(&self) -> SchedulerStage {
        self.stage
    }

    /// Appends a transformer to the end of the chain. Only valid in
    /// `Build`.
    pub fn add_transformer(&mut self, transformer: Box<dyn Transformer>) -> Result<()> {
        if self.stage != SchedulerStage::Build {
            return Err(PipelineError::invalid_argument(
                "add_transformer is only valid in the Build stage",
            ));
        }
        self.transformers.push(transformer);
        self.buffers.push(Buffer::create(MIN_BUF)?);
        Ok(())
    }

    /// Replaces the producer. Valid in `Build` and `Work`; not valid in
    /// `Final` (swapping a producer mid-finalization would reintroduce
    /// upstream data after the scheduler has committed to draining what's
    /// already buffered) or `Done`.
    pub fn set_producer(&mut self, producer: Box<dyn Producer>) -> Result<()> {
        if !matches!(self.stage, SchedulerStage::Build | SchedulerStage::Work) {
            return Err(PipelineError::invalid_argument(
                "set_producer is only valid in Build or Work",
            ));
        }
        self.producer = producer;
        Ok(())
    }

    /// Replaces the consumer. Valid in any stage except `Done`. This is how
    /// a caller collects output in bounded chunks: bind a fresh consumer
    /// and call `finalize` again.
    pub fn set_consumer(&mut self, consumer: Box<dyn Consumer>) -> Result<()> {
        if self.stage == SchedulerStage::Done {
            return Err(PipelineError::invalid_argument("set_consumer is not valid once Done"));
        }
        self.consumer = consumer;
        Ok(())
    }

    /// Runs one work cycle, moving the stage to `Work` if it was `Build`.
    /// Returns once the producer or the consumer reaches end; the producer
    /// reaching end does not by itself finish the pipeline — call
    /// `finalize` to drain transformer-internal state.
    pub fn work(&mut self) -> Result<()> {
        if !matches!(self.stage, SchedulerStage::Build | SchedulerStage::Work) {
            return Err(PipelineError::invalid_argument("work is only valid in Build or Work"));
        }
        self.stage = SchedulerStage::Work;
        self.work_cycle()
    }

    /// Drives the pipeline towards `Done`. May return with the stage still
    /// `Final` if the bound consumer fills up first (`consumer.end()`
    /// becomes true before all data has been drained) — bind a new consumer
    /// with [`Scheduler::set_consumer`] and call `finalize` again to resume
    /// exactly where it left off.
    ///
    /// Note: if the producer never ends and the consumer never ends, this
    /// (like the underlying work cycle) runs forever. The scheduler does
    /// not attempt to detect that case.
    pub fn finalize(&mut self) -> Result<()> {
        if self.stage == SchedulerStage::Done {
            return Err(PipelineError::invalid_argument("finalize is not valid once Done"));
        }
        self.stage = SchedulerStage::Final;

        if self.fin_cursor.is_none() {
            self.work_cycle()?;
            if self.consumer.end() {
                debug!("finalize paused: consumer filled before producer ended");
                return Ok(());
            }
            debug_assert!(self.producer.end());
            self.fin_cursor = Some(0);
        } else {
            self.adjust_buffers()?;
        }

        let n = self.transformers.len();
        while self.fin_cursor.unwrap() != n {
            let i = self.fin_cursor.unwrap();

            // Drain buffers[i] through transformer i (and everything
            // downstream of it) as far as it'll go.
            while self.buffers[i].readable_len() >= self.transformers[i].source_min() {
                self.compact_range(i, n);
                self.work_transformations(i..n)?;
                self.work_sink()?;
                if self.consumer.end() {
                    return Ok(());
                }
            }

            // Free enough room in transformer i's sink for its finalize
            // call by draining everything downstream of it.
            while self.buffers[i + 1].writable_len() < self.transformers[i].sink_min() {
                self.compact_range(i, n);
                self.work_transformations((i + 1)..n)?;
                self.work_sink()?;
                if self.consumer.end() {
                    return Ok(());
                }
            }

            let (source, sink) = Self::buf_pair(&mut self.buffers, i);
            let done = self.transformers[i].finalize(source, sink)?;
            if done.is_done() {
                trace!(transformer = i, "finalize: transformer fully flushed");
                self.fin_cursor = Some(i + 1);
            }
            // Else: loop again, re-checking the same transformer i.
        }

        self.work_sink()?;
        if self.buffers[n].readable_len() < self.consumer.source_min() {
            self.stage = SchedulerStage::Done;
        }
        Ok(())
    }

    fn work_cycle(&mut self) -> Result<()> {
        self.adjust_buffers()?;
        let n = self.transformers.len();
        while !self.producer.end() && !self.consumer.end() {
            self.compact_range(0, n);
            self.work_source()?;
            self.work_transformations(0..n)?;
            self.work_sink()?;
        }
        Ok(())
    }

    /// Buffer sizing policy (spec section 4.3.2): each internal buffer is
    /// sized to `1.5 * demand`, floored at `MIN_BUF`, with a `[demand,
    /// 2*demand]` hysteresis band to avoid thrashing on small fluctuations.
    fn adjust_buffers(&mut self) -> Result<()> {
        let n = self.transformers.len();
        let mut prev_sink_min = self.producer.sink_min();
        for i in 0..n {
            let demand = prev_sink_min + self.transformers[i].source_min();
            Self::adjust_buffer(&mut self.buffers[i], demand)?;
            prev_sink_min = self.transformers[i].sink_min();
        }
        let demand = prev_sink_min + self.consumer.source_min();
        Self::adjust_buffer(&mut self.buffers[n], demand)?;
        Ok(())
    }

    fn adjust_buffer(buf: &mut Buffer, demand: usize) -> Result<()> {
        let mut target = (demand / 2) * 3;
        if target < MIN_BUF {
            target = MIN_BUF;
        }
        let cur = buf.size();
        let lower = (target / 3) * 2;
        let upper = (target / 3) * 4;
        if cur < lower || cur > upper {
            let mut new_size = target;
            if new_size < buf.occupied_len() {
                new_size = buf.occupied_len();
            }
            trace!(old = cur, new = new_size, demand, "resizing internal buffer");
            buf.resize(new_size)?;
        }
        Ok(())
    }

    fn compact_range(&mut self, from: usize, to: usize) {
        for buf in &mut self.buffers[from..=to] {
            buf.compact();
        }
    }

    fn work_source(&mut self) -> Result<()> {
        while !self.producer.end() && self.buffers[0].writable_len() >= self.producer.sink_min() {
            self.producer.send(&mut self.buffers[0])?;
        }
        Ok(())
    }

    fn work_sink(&mut self) -> Result<()> {
        let last = self.buffers.len() - 1;
        while self.buffers[last].readable_len() >= self.consumer.source_min() && !self.consumer.end() {
            self.consumer.send(&mut self.buffers[last])?;
        }
        Ok(())
    }

    /// Advances every transformer whose index lies in `range`, left to
    /// right, each run to exhaustion (as far as its neighbors' occupancy
    /// allows) before moving to the next.
    fn work_transformations(&mut self, range: Range<usize>) -> Result<()> {
        for i in range {
            loop {
                let (source, sink) = Self::buf_pair(&mut self.buffers, i);
                if source.readable_len() >= self.transformers[i].source_min()
                    && sink.writable_len() >= self.transformers[i].sink_min()
                {
                    self.transformers[i].transform(source, sink)?;
                } else {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Splits `buffers` into disjoint mutable references to `buffers[i]`
    /// (source) and `buffers[i+1]` (sink).
    fn buf_pair(buffers: &mut [Buffer], i: usize) -> (&mut Buffer, &mut Buffer) {
        let (head, tail) = buffers.split_at_mut(i + 1);
        (&mut head[i], &mut tail[0])
    }
}
