// Reference-side lookup: block fingerprints, record storage, bucket chains.

pub mod arena;
pub mod checksum;
pub mod table;

pub use arena::{AllocError, Arena};
pub use checksum::block_fingerprint;
pub use table::{BlockIndex, Record, BLOCK_SIZE};
