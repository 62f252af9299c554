//! Log file access
//!
//! Plain files are memory mapped and read from the cursor onward. Gzip files
//! cannot be seeked, so they are decoded in full and the cursor is applied
//! to the decoded text.

use crate::types::{Cursor, Result, ThermoError};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

/// How gzip-compressed logs are decoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Decompressor {
    /// Decode in-process
    #[default]
    Builtin,
    /// Run an external program as `<program> -c <file>` and read its stdout
    Command(String),
}

/// Whether a log file is gzip-compressed, judged by its extension
pub fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Expand shell wildcards in log file names.
///
/// Each pattern contributes its matches in sorted order; a pattern that
/// matches nothing contributes nothing, so a plain name of a missing file is
/// dropped as well.
pub fn expand_paths<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches = glob::glob(pattern)
            .map_err(|e| ThermoError::Config(format!("invalid file pattern '{}': {}", pattern, e)))?;
        let before = paths.len();
        paths.extend(matches.filter_map(|entry| entry.ok()));
        trace!(pattern, matches = paths.len() - before, "Expanded file pattern");
    }
    Ok(paths)
}

/// Text of a log file from some cursor onward
pub enum LogText {
    Mapped { mmap: Mmap, offset: usize },
    Decoded { data: Vec<u8>, offset: usize },
    Empty,
}

impl LogText {
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        match self {
            LogText::Mapped { mmap, offset } => &mmap[*offset..],
            LogText::Decoded { data, offset } => &data[*offset..],
            LogText::Empty => &[],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read the text of `path` starting at `cursor`.
///
/// A cursor past the end of the file yields empty text.
pub fn read_from(path: &Path, cursor: Cursor, decompressor: &Decompressor) -> Result<LogText> {
    let offset = usize::try_from(cursor.offset()).unwrap_or(usize::MAX);

    if is_compressed(path) {
        let data = decode(path, decompressor)?;
        debug!(
            path = %path.display(),
            decoded = data.len(),
            "Decoded compressed log"
        );
        return Ok(if offset < data.len() {
            LogText::Decoded { data, offset }
        } else {
            LogText::Empty
        });
    }

    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if cursor.offset() >= len {
        trace!(path = %path.display(), len, "No unread text");
        return Ok(LogText::Empty);
    }

    let mmap = unsafe { Mmap::map(&file)? };
    // the file may have been truncated between metadata() and map()
    if offset >= mmap.len() {
        return Ok(LogText::Empty);
    }
    Ok(LogText::Mapped { mmap, offset })
}

fn decode(path: &Path, decompressor: &Decompressor) -> Result<Vec<u8>> {
    match decompressor {
        Decompressor::Builtin => {
            let file = File::open(path)?;
            let mut decoder = MultiGzDecoder::new(BufReader::new(file));
            let mut data = Vec::new();
            decoder.read_to_end(&mut data)?;
            Ok(data)
        }
        Decompressor::Command(program) => {
            let output = Command::new(program).arg("-c").arg(path).output()?;
            if !output.status.success() {
                return Err(ThermoError::Io(std::io::Error::other(format!(
                    "{} -c {} failed: {}",
                    program,
                    path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ))));
            }
            Ok(output.stdout)
        }
    }
}
