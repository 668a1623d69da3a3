//! packdelta: binary deltas in the Git packfile delta format.
//!
//! Given a *reference* buffer and a *target* buffer, [`diff`] produces a
//! compact byte stream that [`apply`] combines with the reference to
//! reconstruct the target. The stream is the classic libxdiff-derived
//! encoding used by Git pack objects: two varint sizes followed by
//! insert/copy opcodes, so deltas interoperate with any consumer of that
//! format.
//!
//! The crate provides:
//! - The greedy encoder with an optional hard output ceiling (`encoder`)
//! - The reference block index it matches against (`index`)
//! - The wire format and the applier (`format`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use packdelta::{apply, diff};
//!
//! let reference = b"hello old world";
//! let target = b"hello new world";
//!
//! let delta = diff(reference, target, None).unwrap();
//! let rebuilt = apply(reference, &delta).unwrap();
//! assert_eq!(rebuilt, target);
//! ```
//!
//! Both buffers must be fully in memory and non-empty; the encoder is
//! greedy, single-threaded, and deterministic for a given pair of inputs.

pub mod encoder;
pub mod format;
pub mod index;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

pub use encoder::{diff, DiffError};
pub use format::{apply, read_header, ApplyError, DeltaIter, DeltaOp};
