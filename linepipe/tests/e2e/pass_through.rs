//! Scenario 1: no transformers installed, consumer receives the producer's
//! bytes unchanged.

use linepipe::stages::{SliceCollector, SliceProducer};
use linepipe_core::{Scheduler, SchedulerStage};

#[test]
fn pass_through_with_no_transformers() {
    let input: Vec<u8> = (0..=127u8).collect();
    assert_eq!(input.len(), 128);

    let producer = Box::new(SliceProducer::new(input.clone()));
    let collector = SliceCollector::new(136);
    let handle = collector.handle();

    let mut scheduler = Scheduler::new(producer, Box::new(collector)).unwrap();
    linepipe::run_to_completion(&mut scheduler).unwrap();

    assert_eq!(scheduler.stage(), SchedulerStage::Done);
    assert_eq!(&*handle.borrow(), &input[..]);
}
