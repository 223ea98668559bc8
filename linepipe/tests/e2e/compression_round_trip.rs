//! Scenario 5: deflate -> inflate round trip over a file-backed stream
//! larger than any single internal buffer, exercising finalize across many
//! work cycles.
//!
//! The reference scenario uses 4 GiB of random data; a few megabytes is
//! enough to exercise the same property (buffering and finalize spanning
//! many cycles) without a multi-gigabyte test fixture.

use std::fs;

use linepipe::stages::{FileConsumer, FileProducer};
use linepipe::StageSpec;
use linepipe_core::SchedulerStage;
use tempfile::NamedTempFile;

use crate::common::pseudo_random_bytes;

#[test]
fn deflate_inflate_round_trips_file_backed_data() {
    let data = pseudo_random_bytes(3 * 1024 * 1024 + 37, 0xC0FFEE);

    let input_file = NamedTempFile::new().unwrap();
    fs::write(input_file.path(), &data).unwrap();
    let output_file = NamedTempFile::new().unwrap();

    let producer = Box::new(FileProducer::open(input_file.path()).unwrap());
    let consumer = Box::new(FileConsumer::create(output_file.path()).unwrap());
    let recipe = vec![StageSpec::Deflate { level: 6 }, StageSpec::Inflate];
    let mut scheduler = linepipe::build_pipeline(producer, consumer, &recipe).unwrap();
    linepipe::run_to_completion(&mut scheduler).unwrap();

    assert_eq!(scheduler.stage(), SchedulerStage::Done);
    let roundtripped = fs::read(output_file.path()).unwrap();
    assert_eq!(roundtripped, data);
}
