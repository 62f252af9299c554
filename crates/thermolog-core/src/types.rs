//! Common types, errors, and constants for thermo log operations

use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Start of a multi-line thermo block ("------ Step N ----- CPU = ...")
pub const MULTI_MARKER: &str = "----- Step";
/// Start of a one-line thermo header ("Step Temp E_pair ...")
pub const SINGLE_MARKER: &str = "Step ";
/// Separator between consecutive multi-line blocks
pub const MULTI_SEPARATOR: &str = "\n--";
/// Separator between consecutive one-line entries
pub const SINGLE_SEPARATOR: &str = "\n";
/// Footer written when a run finishes
pub const FOOTER_MARKER: &str = "Loop time of";

/// Name given to the leading column of multi-line blocks
pub const STEP_NAME: &str = "Step";

// ============================================================================
// Enums
// ============================================================================

/// Textual convention used by the producer for thermo output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Multi-line blocks of `name = value` pairs
    Multi,
    /// One whitespace-separated line per entry under a column header
    Single,
}

impl Layout {
    /// Marker that opens a run of entries
    #[inline]
    pub fn marker(&self) -> &'static [u8] {
        match self {
            Layout::Multi => MULTI_MARKER.as_bytes(),
            Layout::Single => SINGLE_MARKER.as_bytes(),
        }
    }

    /// Marker that separates two entries
    #[inline]
    pub fn separator(&self) -> &'static [u8] {
        match self {
            Layout::Multi => MULTI_SEPARATOR.as_bytes(),
            Layout::Single => SINGLE_SEPARATOR.as_bytes(),
        }
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Resumable position into a growing log file.
///
/// Marks the first byte not yet guaranteed to be fully consumed. For
/// compressed files the position refers to the decoded text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    offset: u64,
}

impl Cursor {
    /// Cursor at the beginning of a file
    pub const fn start() -> Self {
        Self { offset: 0 }
    }

    /// Move forward over `n` bytes that were read
    #[must_use]
    pub fn advance(self, n: usize) -> Self {
        Self {
            offset: self.offset + n as u64,
        }
    }

    /// Give back the last `k` bytes so they are offered again on the next read
    #[must_use]
    pub fn rewind(self, k: usize) -> Self {
        Self {
            offset: self.offset.saturating_sub(k as u64),
        }
    }

    #[inline]
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// One parsed thermo entry; element 0 is the timestep
pub type Row = Vec<f64>;

/// Timestep of a thermo entry
pub type Timestep = i64;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for thermo log operations
#[derive(Debug, Error)]
pub enum ThermoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("log file has no values: {}", .0.display())]
    EmptyData(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("log vector '{0}' not found")]
    NotFound(String),

    #[error("log vector '{0}' is not unique")]
    NotUnique(String),

    #[error("no log vectors specified")]
    NoVectors,
}

impl ThermoError {
    /// Prefix a parse error with the file it came from
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            ThermoError::Parse(msg) => ThermoError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ThermoError>;
