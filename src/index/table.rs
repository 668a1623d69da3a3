// Block index over the reference buffer.
//
// The reference is viewed as non-overlapping BLOCK_SIZE windows. The walk
// starts at the last block boundary and steps toward offset 0; a short block
// exists only at the tail, when the length is not a multiple of BLOCK_SIZE.
// Each block yields one record
// `{fingerprint, offset}` stored in the arena and prepended to its bucket
// chain. Prepending during the high-to-low walk leaves every chain ordered
// low offset to high offset, which the encoder's strict best-match update
// turns into a deterministic tie-break.
//
// Buckets hold record handles offset by one so that 0 means "empty", the
// same sentinel scheme the chain links use.

use super::arena::{AllocError, Arena};
use super::checksum::block_fingerprint;

/// Width of one index block. Must be a power of two in `[16, 65536]`.
pub const BLOCK_SIZE: usize = 16;

/// Multiplier for the bucket hash (Fibonacci-style mix of the fingerprint).
const BUCKET_PRIME: u32 = 0x9E37_0001;

/// One indexed reference block.
pub struct Record {
    /// Adler-32 of the block.
    pub fp: u32,
    /// Byte offset of the block within the reference.
    pub offset: u32,
    /// Next record handle + 1 in the same bucket, 0 at chain end.
    next: u32,
}

/// Fingerprint-to-offset lookup over the reference buffer.
pub struct BlockIndex {
    bits: u32,
    buckets: Vec<u32>,
    records: Arena<Record>,
}

/// Smallest `bits` with `2^bits >= n`, clamped to `[1, 32]`.
fn bucket_bits(n: usize) -> u32 {
    let mut val: u64 = 1;
    let mut bits: u32 = 0;
    while val < n as u64 && bits < 32 {
        val <<= 1;
        bits += 1;
    }
    bits.max(1)
}

impl BlockIndex {
    /// Index every block of `reference`.
    pub fn build(reference: &[u8]) -> Result<Self, AllocError> {
        let bits = bucket_bits(reference.len() / BLOCK_SIZE + 1);
        let size = 1usize << bits;

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(size)?;
        buckets.resize(size, 0u32);

        let mut index = Self {
            bits,
            buckets,
            records: Arena::new(size / 4 + 1),
        };

        if reference.is_empty() {
            return Ok(index);
        }

        // Tail-anchored walk start: the last block boundary, stepped back a
        // full block when the length is an exact multiple.
        let mut start = (reference.len() / BLOCK_SIZE) * BLOCK_SIZE;
        if start == reference.len() {
            start -= BLOCK_SIZE;
        }

        for off in (0..=start).rev().step_by(BLOCK_SIZE) {
            let Ok(offset) = u32::try_from(off) else {
                // A copy opcode cannot address past 4 GiB anyway.
                continue;
            };
            let end = (off + BLOCK_SIZE).min(reference.len());
            let fp = block_fingerprint(&reference[off..end]);
            let bucket = index.bucket_of(fp);
            let handle = index.records.alloc(Record {
                fp,
                offset,
                next: index.buckets[bucket],
            })?;
            index.buckets[bucket] = handle + 1;
        }

        Ok(index)
    }

    /// Bucket for a fingerprint.
    #[inline]
    fn bucket_of(&self, fp: u32) -> usize {
        (fp.wrapping_mul(BUCKET_PRIME) >> (32 - self.bits)) as usize
    }

    /// Walk the chain whose bucket `fp` hashes to.
    ///
    /// The chain can contain records for other fingerprints that collided
    /// into the bucket; callers filter on `Record::fp`.
    #[inline]
    pub fn probe(&self, fp: u32) -> Chain<'_> {
        Chain {
            index: self,
            head: self.buckets[self.bucket_of(fp)],
        }
    }

    /// Total number of indexed blocks.
    pub fn record_count(&self) -> u32 {
        self.records.len()
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Iterator over one bucket chain, head to tail.
pub struct Chain<'a> {
    index: &'a BlockIndex,
    head: u32,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<&'a Record> {
        if self.head == 0 {
            return None;
        }
        let record = self.index.records.get(self.head - 1);
        self.head = record.next;
        Some(record)
    }
}
