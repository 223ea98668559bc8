//! Scenario 4: digest(SHA-1) over the 263-byte literal (no trailing null).

use linepipe::stages::{SliceCollector, SliceProducer};
use linepipe::StageSpec;
use linepipe_core::SchedulerStage;

use crate::common::literal_263;

#[test]
fn sha1_digest_matches_known_vector() {
    let input = literal_263();

    let producer = Box::new(SliceProducer::new(input));
    let collector = SliceCollector::new(28);
    let handle = collector.handle();

    let recipe = vec![StageSpec::Sha1Digest];
    let mut scheduler = linepipe::build_pipeline(producer, Box::new(collector), &recipe).unwrap();
    linepipe::run_to_completion(&mut scheduler).unwrap();

    assert_eq!(scheduler.stage(), SchedulerStage::Done);
    let expected: [u8; 20] = [
        0x5e, 0x91, 0x6a, 0x59, 0xe9, 0x97, 0x3b, 0xb7, 0xbe, 0x02, 0x90, 0xe1, 0xf2, 0x83, 0xe3,
        0xd3, 0x08, 0xaa, 0x7c, 0x11,
    ];
    assert_eq!(&*handle.borrow(), &expected);
}
