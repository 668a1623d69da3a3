// Greedy delta encoder.
//
// The driver walks the target one position at a time. At each position it
// fingerprints the next block, probes the reference index, and extends every
// fingerprint hit byte by byte; the longest extension wins, with the strict
// comparison keeping the earliest chain entry (the lowest reference offset)
// on ties. A match is only emitted as a copy when it is at least as long as
// the copy opcode that would encode it; everything else joins the open
// insert run.
//
// Output grows by 3/2 from an 8 KiB start. With a caller ceiling the
// capacity is clamped to `limit + MAX_OP_SIZE + 1`, and every post-opcode
// checkpoint that finds the output past the ceiling aborts the call.

use std::collections::TryReserveError;
use std::fmt;

use crate::format::opcode::{copy_op_size, push_copy, MAX_COPY, MAX_INSERT, MAX_OP_SIZE};
use crate::format::varint;
use crate::index::{block_fingerprint, AllocError, BlockIndex, BLOCK_SIZE};

/// Starting output capacity, before any ceiling clamp.
const INITIAL_CAPACITY: usize = 8192;

/// Delta encoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The reference or the target is empty; the format has no encoding for
    /// either case.
    EmptyInput,
    /// An allocation failed (index records, bucket array, or output growth).
    OutOfMemory,
    /// The delta cannot be expressed within the caller's size ceiling.
    DeltaTooLarge { limit: usize },
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "reference and target must be non-empty"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::DeltaTooLarge { limit } => {
                write!(f, "delta exceeds the {limit}-byte ceiling")
            }
        }
    }
}

impl std::error::Error for DiffError {}

impl From<AllocError> for DiffError {
    fn from(_: AllocError) -> Self {
        Self::OutOfMemory
    }
}

impl From<TryReserveError> for DiffError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Compute the delta that rebuilds `target` from `reference`.
///
/// `limit` is a hard ceiling on the delta size in bytes; `None` is
/// unlimited. When the delta cannot fit the ceiling the call fails with
/// [`DiffError::DeltaTooLarge`] and returns nothing; partial output is
/// never produced.
///
/// ```
/// use packdelta::{apply, diff};
///
/// let reference = b"the quick brown fox jumps over the lazy dog";
/// let target = b"the quick brown cat jumps over the lazy dog";
/// let delta = diff(reference, target, None).unwrap();
/// assert_eq!(apply(reference, &delta).unwrap(), target);
/// ```
pub fn diff(reference: &[u8], target: &[u8], limit: Option<usize>) -> Result<Vec<u8>, DiffError> {
    if reference.is_empty() || target.is_empty() {
        return Err(DiffError::EmptyInput);
    }

    let index = BlockIndex::build(reference)?;

    let mut cap = INITIAL_CAPACITY;
    if let Some(limit) = limit {
        if cap >= limit {
            cap = limit + MAX_OP_SIZE + 1;
        }
    }
    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(cap)?;

    varint::write_size(&mut out, reference.len() as u64);
    varint::write_size(&mut out, target.len() as u64);

    let mut inscnt: usize = 0;
    let mut pos: usize = 0;
    while pos < target.len() {
        let tail = &target[pos..];
        let fp = block_fingerprint(&tail[..tail.len().min(BLOCK_SIZE)]);

        let mut msize: usize = 0;
        let mut moff: u32 = 0;
        for record in index.probe(fp) {
            if record.fp != fp {
                continue;
            }
            let roff = record.offset as usize;
            let room = (reference.len() - roff).min(tail.len()).min(MAX_COPY);
            let mut len = 0;
            while len < room && reference[roff + len] == tail[len] {
                len += 1;
            }
            if len > msize {
                moff = record.offset;
                msize = len;
                if msize >= MAX_COPY {
                    msize = MAX_COPY;
                    break;
                }
            }
        }

        if msize == 0 || msize < copy_op_size(moff, msize as u32) {
            // Literal byte: open or extend the insert run.
            if inscnt == 0 {
                out.push(0); // reserved for the run's length byte
            }
            out.push(tail[0]);
            pos += 1;
            inscnt += 1;
            if inscnt == MAX_INSERT {
                close_insert_run(&mut out, &mut inscnt);
            }
        } else {
            if inscnt > 0 {
                close_insert_run(&mut out, &mut inscnt);
            }
            pos += msize;
            push_copy(&mut out, moff, msize as u32);
        }

        // Growth checkpoint: keep MAX_OP_SIZE headroom for the next opcode,
        // and enforce the ceiling while growing.
        if out.len() >= cap - MAX_OP_SIZE {
            cap = cap * 3 / 2;
            if let Some(limit) = limit {
                if cap >= limit {
                    cap = limit + MAX_OP_SIZE + 1;
                }
                if out.len() > limit {
                    return Err(DiffError::DeltaTooLarge { limit });
                }
            }
            if cap > out.capacity() {
                out.try_reserve_exact(cap - out.len())?;
            }
        }
    }

    if inscnt > 0 {
        close_insert_run(&mut out, &mut inscnt);
    }
    Ok(out)
}

/// Write the pending run's length into its reserved byte.
fn close_insert_run(out: &mut [u8], inscnt: &mut usize) {
    debug_assert!(*inscnt >= 1 && *inscnt <= MAX_INSERT);
    let at = out.len() - *inscnt - 1;
    out[at] = *inscnt as u8;
    *inscnt = 0;
}
