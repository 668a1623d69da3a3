// File-level helpers around the in-memory core.
//
// The encoder works on whole buffers, so these helpers read both inputs up
// front, run the core, and write the result, returning size stats for the
// caller to report. Optionally computes SHA-256 digests of the payloads
// (feature-gated behind `file-io`).

use std::fs;
use std::io;
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::encoder::{diff, DiffError};
use crate::format::apply::{apply, ApplyError};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `diff_file()`.
#[derive(Debug, Clone)]
pub struct DiffStats {
    /// Reference file size in bytes.
    pub reference_size: u64,
    /// Target file size in bytes.
    pub target_size: u64,
    /// Delta output size in bytes.
    pub delta_size: u64,
    /// SHA-256 of the target file (if the `file-io` feature is enabled).
    pub target_sha256: Option<[u8; 32]>,
}

impl DiffStats {
    /// Delta bytes per target byte; below 1.0 means the delta saved space.
    pub fn ratio(&self) -> f64 {
        self.delta_size as f64 / self.target_size as f64
    }
}

/// Statistics returned by `apply_file()`.
#[derive(Debug, Clone)]
pub struct ApplyStats {
    /// Reference file size in bytes.
    pub reference_size: u64,
    /// Delta file size in bytes.
    pub delta_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    /// SHA-256 of the reconstructed output (if `file-io` is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug)]
pub enum FileError {
    /// I/O error (file open, read, write).
    Io(io::Error),
    /// Delta encoding error.
    Diff(DiffError),
    /// Delta application error.
    Apply(ApplyError),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Diff(e) => write!(f, "diff error: {e}"),
            Self::Apply(e) => write!(f, "apply error: {e}"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Diff(e) => Some(e),
            Self::Apply(e) => Some(e),
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<DiffError> for FileError {
    fn from(e: DiffError) -> Self {
        Self::Diff(e)
    }
}

impl From<ApplyError> for FileError {
    fn from(e: ApplyError) -> Self {
        Self::Apply(e)
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Diff `target_path` against `reference_path`, writing the delta to
/// `delta_path`.
pub fn diff_file(
    reference_path: &Path,
    target_path: &Path,
    delta_path: &Path,
    limit: Option<usize>,
) -> Result<DiffStats, FileError> {
    let reference = fs::read(reference_path)?;
    let target = fs::read(target_path)?;
    let delta = diff(&reference, &target, limit)?;
    fs::write(delta_path, &delta)?;
    Ok(DiffStats {
        reference_size: reference.len() as u64,
        target_size: target.len() as u64,
        delta_size: delta.len() as u64,
        target_sha256: digest(&target),
    })
}

/// Apply the delta at `delta_path` to `reference_path`, writing the
/// reconstructed target to `output_path`.
pub fn apply_file(
    reference_path: &Path,
    delta_path: &Path,
    output_path: &Path,
) -> Result<ApplyStats, FileError> {
    let reference = fs::read(reference_path)?;
    let delta = fs::read(delta_path)?;
    let output = apply(&reference, &delta)?;
    fs::write(output_path, &output)?;
    Ok(ApplyStats {
        reference_size: reference.len() as u64,
        delta_size: delta.len() as u64,
        output_size: output.len() as u64,
        output_sha256: digest(&output),
    })
}

#[cfg(feature = "file-io")]
fn digest(data: &[u8]) -> Option<[u8; 32]> {
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    Some(hasher.finalize().into())
}

#[cfg(not(feature = "file-io"))]
fn digest(_data: &[u8]) -> Option<[u8; 32]> {
    None
}
