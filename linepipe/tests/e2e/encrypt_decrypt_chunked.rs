//! Scenario 3: AES-256-CBC encrypt -> decrypt round trip, draining output
//! through a consumer that is rebound 16 times at capacity 16 and once more
//! at capacity 8, exercising the finalize handshake's multi-call resumption.

use linepipe::stages::{DecryptTransformer, EncryptTransformer, SliceCollector, SliceProducer};
use linepipe_core::{Scheduler, SchedulerStage};

use crate::common::literal_264;

#[test]
fn encrypt_then_decrypt_round_trips_through_a_chunked_consumer() {
    let input = literal_264();

    let producer = Box::new(SliceProducer::new(input.clone()));
    let first = SliceCollector::new(16);
    let first_handle = first.handle();

    let mut scheduler = Scheduler::new(producer, Box::new(first)).unwrap();
    scheduler
        .add_transformer(Box::new(EncryptTransformer::new("mykey").unwrap()))
        .unwrap();
    scheduler
        .add_transformer(Box::new(DecryptTransformer::new("mykey").unwrap()))
        .unwrap();

    let mut collected = Vec::new();

    scheduler.finalize().unwrap();
    assert_eq!(scheduler.stage(), SchedulerStage::Final);
    assert_eq!(first_handle.borrow().len(), 16);
    collected.extend_from_slice(&first_handle.borrow());

    for _ in 1..16 {
        let collector = SliceCollector::new(16);
        let handle = collector.handle();
        scheduler.set_consumer(Box::new(collector)).unwrap();
        scheduler.finalize().unwrap();
        assert_eq!(scheduler.stage(), SchedulerStage::Final);
        assert_eq!(handle.borrow().len(), 16);
        collected.extend_from_slice(&handle.borrow());
    }

    let last = SliceCollector::new(8);
    let last_handle = last.handle();
    scheduler.set_consumer(Box::new(last)).unwrap();
    scheduler.finalize().unwrap();
    assert_eq!(scheduler.stage(), SchedulerStage::Done);
    collected.extend_from_slice(&last_handle.borrow());

    assert_eq!(collected, input);
}
