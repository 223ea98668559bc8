//! Scenario 2: base64-encode -> base64-decode round trip.

use linepipe::stages::{SliceCollector, SliceProducer};
use linepipe::StageSpec;
use linepipe_core::SchedulerStage;

use crate::common::literal_264;

#[test]
fn base64_encode_then_decode_round_trips() {
    let input = literal_264();

    let producer = Box::new(SliceProducer::new(input.clone()));
    let collector = SliceCollector::new(512);
    let handle = collector.handle();

    let recipe = vec![StageSpec::Base64Encode, StageSpec::Base64Decode];
    let mut scheduler = linepipe::build_pipeline(producer, Box::new(collector), &recipe).unwrap();
    linepipe::run_to_completion(&mut scheduler).unwrap();

    assert_eq!(scheduler.stage(), SchedulerStage::Done);
    assert_eq!(&*handle.borrow(), &input[..]);
}
