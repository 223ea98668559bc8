// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! File-backed producer and consumer.
//!
//! Thin adapters over [`std::fs::File`], grounded on the reference
//! `file/source_file.c` and `file/sink_file.c`: `sink_min`/`source_min` are
//! both 1 (a file offers no minimum batch size), and `end()` is keyed off
//! having observed end-of-file on the most recent read (a file sink never
//! ends on its own — writes just keep succeeding).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use linepipe_core::{Buffer, Consumer, PipelineError, Producer, Result};

/// Reads a file (or any `Read` stream) into the pipeline.
pub struct FileProducer {
    file: Box<dyn Read + Send>,
    eof: bool,
}

impl FileProducer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Wraps an arbitrary reader (e.g. `std::io::stdin()`).
    pub fn new(file: Box<dyn Read + Send>) -> Self {
        Self { file, eof: false }
    }
}

impl Producer for FileProducer {
    fn sink_min(&self) -> usize {
        1
    }

    fn end(&self) -> bool {
        self.eof
    }

    fn send(&mut self, sink: &mut Buffer) -> Result<()> {
        let n = self.file.read(sink.write_slice())?;
        if n == 0 {
            self.eof = true;
        } else {
            sink.append(n);
        }
        Ok(())
    }
}

/// Writes pipeline output to a file (or any `Write` stream). Never reports
/// `end()` on its own — a write sink has no natural termination, matching
/// `sink_file_end` always observing `feof` false on a write-only stream.
pub struct FileConsumer {
    file: Box<dyn Write + Send>,
}

impl FileConsumer {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    pub fn new(file: Box<dyn Write + Send>) -> Self {
        Self { file }
    }
}

impl Consumer for FileConsumer {
    fn source_min(&self) -> usize {
        1
    }

    fn end(&self) -> bool {
        false
    }

    fn send(&mut self, source: &mut Buffer) -> Result<()> {
        let n = self
            .file
            .write(source.read_slice())
            .map_err(PipelineError::from)?;
        if n == 0 {
            return Err(PipelineError::unexpected("file write accepted zero bytes"));
        }
        source.consume(n);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn producer_reads_whole_file_and_reports_end() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"hello, file").unwrap();
        let mut producer = FileProducer::open(tmp.path()).unwrap();
        let mut buf = Buffer::create(4096).unwrap();
        while !producer.end() {
            producer.send(&mut buf).unwrap();
        }
        assert_eq!(buf.read_slice(), b"hello, file");
    }

    #[test]
    fn consumer_never_reports_end() {
        let tmp = NamedTempFile::new().unwrap();
        let consumer = FileConsumer::create(tmp.path()).unwrap();
        assert!(!consumer.end());
    }

    #[test]
    fn round_trip_through_file_consumer_and_producer() {
        let out = NamedTempFile::new().unwrap();
        {
            let mut consumer = FileConsumer::create(out.path()).unwrap();
            let mut buf = Buffer::create(16).unwrap();
            buf.write_slice()[..5].copy_from_slice(b"abcde");
            buf.append(5);
            while buf.readable_len() > 0 {
                consumer.send(&mut buf).unwrap();
            }
        }
        let mut producer = FileProducer::open(out.path()).unwrap();
        let mut buf = Buffer::create(16).unwrap();
        while !producer.end() {
            producer.send(&mut buf).unwrap();
        }
        assert_eq!(buf.read_slice(), b"abcde");
    }
}
