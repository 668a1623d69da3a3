#![no_main]
use libfuzzer_sys::fuzz_target;
use packdelta::{apply, diff};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // First byte picks the split; both halves end up non-empty.
    let split = 1 + usize::from(data[0]) % (data.len() - 2);
    let (reference, target) = data[1..].split_at(split);

    // Whatever the encoder produces, the applier must reconstruct exactly.
    let delta = diff(reference, target, None).unwrap();
    let rebuilt = apply(reference, &delta).unwrap();
    assert_eq!(rebuilt, target);
});
