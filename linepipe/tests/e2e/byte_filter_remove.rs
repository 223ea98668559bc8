//! Scenario 6: remove every occurrence of `{'0','2','6','7'}` from the
//! 264-byte literal.

use linepipe::stages::{SliceCollector, SliceProducer};
use linepipe::StageSpec;
use linepipe_core::SchedulerStage;

use crate::common::literal_264;

#[test]
fn remove_filter_drops_all_occurrences_of_four_bytes() {
    let input = literal_264();

    let producer = Box::new(SliceProducer::new(input.clone()));
    let collector = SliceCollector::new(272);
    let handle = collector.handle();

    let recipe = vec![StageSpec::RemoveBytes {
        symbols: b"0267".to_vec(),
    }];
    let mut scheduler = linepipe::build_pipeline(producer, Box::new(collector), &recipe).unwrap();
    linepipe::run_to_completion(&mut scheduler).unwrap();

    assert_eq!(scheduler.stage(), SchedulerStage::Done);
    let out = handle.borrow();
    assert_eq!(out.len(), 200);
    for &b in b"0267" {
        assert!(!out.contains(&b));
    }
    let expected: Vec<u8> = input.into_iter().filter(|b| !b"0267".contains(b)).collect();
    assert_eq!(&*out, &expected[..]);
}
