// Pinned wire-format vectors.
//
// The delta stream must be byte-exact: any consumer of the Git packfile
// delta format has to be able to execute it. These tests pin the encoder's
// output for small hand-checked inputs and verify the stream-level laws
// (header sizes, insert-run shape, copy-op cost) on real encoder output.

use packdelta::encoder::DiffError;
use packdelta::format::opcode::{copy_op_size, MAX_COPY, MAX_INSERT, MAX_OP_SIZE};
use packdelta::{apply, diff, read_header, DeltaIter, DeltaOp};

fn encode(reference: &[u8], target: &[u8]) -> Vec<u8> {
    diff(reference, target, None).expect("diff failed")
}

fn ops(delta: &[u8]) -> Vec<DeltaOp<'_>> {
    let (_, _, header_len) = read_header(delta).unwrap();
    DeltaIter::new(&delta[header_len..])
        .map(|op| op.unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Pinned byte vectors
// ---------------------------------------------------------------------------

#[test]
fn identical_single_block() {
    let delta = encode(b"abcdefghijklmnop", b"abcdefghijklmnop");
    assert_eq!(delta, [0x10, 0x10, 0x90, 0x10]);
}

#[test]
fn appended_byte_becomes_an_insert() {
    let delta = encode(b"abcdefghijklmnop", b"abcdefghijklmnopQ");
    assert_eq!(delta, [0x10, 0x11, 0x90, 0x10, 0x01, b'Q']);
}

#[test]
fn tiny_target_is_a_single_insert() {
    // A one-byte match would cost more than the literal, so no copy appears.
    let delta = encode(b"abcdefghijklmnop", b"Q");
    assert_eq!(delta, [0x10, 0x01, 0x01, b'Q']);
}

#[test]
fn swapped_blocks_become_two_copies() {
    let delta = encode(
        b"0123456789abcdefGHIJKLMNOPQRSTUV",
        b"GHIJKLMNOPQRSTUV0123456789abcdef",
    );
    assert_eq!(
        delta,
        [0x20, 0x20, 0x91, 0x10, 0x10, 0x90, 0x10]
    );
}

#[test]
fn long_run_caps_copies_at_65536() {
    let data = vec![b'a'; 70_000];
    let delta = encode(&data, &data);
    // 70000 as a varint is F0 A2 04; the first copy is the full 65536 bytes
    // with both size bits clear, the second covers the remaining 4464.
    assert_eq!(
        delta,
        [0xF0, 0xA2, 0x04, 0xF0, 0xA2, 0x04, 0x80, 0xB0, 0x70, 0x11]
    );
    assert_eq!(apply(&data, &delta).unwrap(), data);
}

#[test]
fn ceiling_below_minimum_fails() {
    assert_eq!(
        diff(b"abcdef", b"abcdef", Some(3)).unwrap_err(),
        DiffError::DeltaTooLarge { limit: 3 }
    );
}

#[test]
fn equal_length_match_keeps_the_lowest_offset() {
    // Both reference halves hold the identical block; the chain is probed
    // low offset first and a tie never displaces the recorded match, so the
    // copy reads from offset 0.
    let mut reference = Vec::new();
    reference.extend_from_slice(b"abcdefghijklmnop");
    reference.extend_from_slice(b"abcdefghijklmnop");
    let delta = encode(&reference, b"abcdefghijklmnop");
    assert_eq!(delta, [0x20, 0x10, 0x90, 0x10]);
}

// ---------------------------------------------------------------------------
// Stream-level laws
// ---------------------------------------------------------------------------

#[test]
fn header_names_both_sizes() {
    let reference: Vec<u8> = (0..777u32).map(|i| (i % 256) as u8).collect();
    let target: Vec<u8> = (0..1234u32).map(|i| (i * 3 % 256) as u8).collect();
    let delta = encode(&reference, &target);
    let (reference_size, target_size, _) = read_header(&delta).unwrap();
    assert_eq!(reference_size, 777);
    assert_eq!(target_size, 1234);
}

#[test]
fn every_copy_is_worth_its_encoding() {
    let reference: Vec<u8> = (0..4096u32).map(|i| (i * 17 % 256) as u8).collect();
    let mut target = reference.clone();
    for i in (0..target.len()).step_by(97) {
        target[i] = target[i].wrapping_add(1);
    }
    let delta = encode(&reference, &target);
    let mut saw_copy = false;
    for op in ops(&delta) {
        if let DeltaOp::Copy { offset, len } = op {
            saw_copy = true;
            assert!(len <= MAX_COPY);
            assert!(
                len >= copy_op_size(offset as u32, len as u32),
                "copy (offset={offset}, len={len}) costs more than inserting"
            );
        }
    }
    assert!(saw_copy, "expected at least one copy for similar data");
}

#[test]
fn insert_runs_stay_within_127_literals() {
    // Incompressible target against an unrelated reference: all literals.
    let reference = vec![0u8; 64];
    let target: Vec<u8> = (0..300u32).map(|i| (i * 31 % 256) as u8).collect();
    let delta = encode(&reference, &target);

    let decoded = ops(&delta);
    let lens: Vec<usize> = decoded
        .iter()
        .map(|op| match op {
            DeltaOp::Insert(literal) => literal.len(),
            DeltaOp::Copy { .. } => panic!("unexpected copy in incompressible target"),
        })
        .collect();
    assert_eq!(lens, vec![MAX_INSERT, MAX_INSERT, 300 - 2 * MAX_INSERT]);

    // The literals themselves must window the target in order.
    let mut rebuilt = Vec::new();
    for op in &decoded {
        if let DeltaOp::Insert(literal) = op {
            assert!(!literal.is_empty());
            rebuilt.extend_from_slice(literal);
        }
    }
    assert_eq!(rebuilt, target);
}

#[test]
fn successful_deltas_respect_the_ceiling() {
    let reference: Vec<u8> = (0..2048u32).map(|i| (i % 256) as u8).collect();
    let mut target = reference.clone();
    target[1024] ^= 0xFF;
    let unlimited = encode(&reference, &target);
    let delta = diff(&reference, &target, Some(unlimited.len())).unwrap();
    assert!(delta.len() <= unlimited.len() + MAX_OP_SIZE + 1);
    assert_eq!(delta, unlimited);
}

#[test]
fn empty_inputs_never_produce_a_delta() {
    for limit in [None, Some(0), Some(1024)] {
        assert_eq!(diff(b"", b"abc", limit).unwrap_err(), DiffError::EmptyInput);
        assert_eq!(diff(b"abc", b"", limit).unwrap_err(), DiffError::EmptyInput);
    }
}

#[test]
fn identity_delta_is_much_smaller_than_the_input() {
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 253) as u8).collect();
    let delta = encode(&data, &data);
    assert!(delta.len() * 100 < data.len());
    assert_eq!(apply(&data, &delta).unwrap(), data);
}
