#![no_main]
use libfuzzer_sys::fuzz_target;
use packdelta::apply;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a delta: the applier must only ever return errors,
    // never panic.
    let _ = apply(&[], data);

    if data.len() >= 2 {
        let split = data.len() / 2;
        let (reference, delta) = data.split_at(split);
        let _ = apply(reference, delta);
    }
});
