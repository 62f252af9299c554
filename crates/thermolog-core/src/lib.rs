//! # LAMMPS Thermo Log Reader - Core Library
//!
//! Extracts thermodynamic output from LAMMPS log files into named,
//! timestep-indexed vectors.
//!
//! ## Supported Layouts
//!
//! - `thermo_style multi`: multi-line blocks of `name = value` pairs
//! - `thermo_style one`/`custom`: one line per entry under a column header
//!
//! ## Features
//!
//! - Batch reading of several log files, merged and sorted by timestep
//! - Duplicate timesteps across files are dropped
//! - Gzip-compressed logs (`.gz`)
//! - Incremental polling of a log that is still being written
//! - Vector lookup by exact name or unique prefix
//! - Structured logging via `tracing` for diagnostics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thermolog_core::read;
//!
//! let log = read(&["log.lammps", "log.restart.gz"]).unwrap();
//! println!("Vectors: {:?}", log.names());
//! println!("Entries: {}", log.len());
//!
//! // Exact name or unique prefix
//! let pe = log.column("PotEng").unwrap();
//! let vectors = log.get(&["Step", "Temp"]).unwrap();
//! assert_eq!(vectors.len(), 2);
//! ```
//!
//! ## Following a Running Simulation
//!
//! ```rust,no_run
//! use thermolog_core::follow;
//!
//! let mut log = follow("log.lammps").unwrap();
//! loop {
//!     if let Some(step) = log.poll().unwrap() {
//!         println!("Read up to step {}", step);
//!     }
//!     std::thread::sleep(std::time::Duration::from_secs(1));
//! }
//! ```
//!
//! ## Enabling Logging
//!
//! This library uses `tracing` for structured logging. To see log output,
//! initialize a tracing subscriber in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//!
//! let log = thermolog_core::read(&["log.lammps"]).unwrap();
//! ```

mod catalog;
mod entry;
mod layout;
mod scanner;
mod session;
mod source;
mod table;
mod types;
mod writer;

use std::path::Path;

// Re-export public types
pub use types::{
    // Core types
    Cursor,
    Layout,
    Result,
    Row,
    // Error types
    ThermoError,
    Timestep,
    // Constants
    FOOTER_MARKER,
    MULTI_MARKER,
    MULTI_SEPARATOR,
    SINGLE_MARKER,
    SINGLE_SEPARATOR,
    STEP_NAME,
};

// Re-export session types
pub use session::{LogOptions, ThermoLog};
pub use source::{expand_paths, is_compressed, Decompressor};

// Re-export building blocks for advanced use
pub use catalog::VectorCatalog;
pub use entry::parse_chunk;
pub use layout::{detect, ThermoHeader};
pub use scanner::{Boundary, Chunk, ChunkScanner};
pub use table::VectorTable;

// ============================================================================
// Public API Functions
// ============================================================================

/// Read one or more log files.
///
/// # Arguments
/// * `paths` - Log files, plain or `.gz`; wildcards must already be expanded,
///   see [`expand_paths`]
///
/// # Returns
/// * `Ok(ThermoLog)` - Entries of all files, sorted by timestep with duplicates removed
/// * `Err(ThermoError)` - If a file cannot be read or parsed, or has no thermo output
pub fn read<P: AsRef<Path>>(paths: &[P]) -> Result<ThermoLog> {
    ThermoLog::open(paths)
}

/// Track a single log file incrementally.
///
/// Nothing is read until [`ThermoLog::poll`] is called; the file does not
/// need to exist yet.
pub fn follow<P: AsRef<Path>>(path: P) -> Result<ThermoLog> {
    ThermoLog::open_with(&[path.as_ref()], LogOptions::new().incremental())
}
