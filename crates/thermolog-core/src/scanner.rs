//! Chunk boundary scanner
//!
//! Walks raw log text and yields successive chunks of complete thermo
//! entries. Each step looks for the next run marker (`S`) and the next
//! `Loop time of` footer (`F`) and decides where the chunk ends:
//!
//! | S     | F     | decision                                        |
//! |-------|-------|-------------------------------------------------|
//! | found | found | S before F: one finished run, `[S, F)`          |
//! | found | found | F before S: rest of a run, `[start, F)`         |
//! | -     | found | last run of the text, `[start, F)`, final       |
//! | found | -     | run still being written, final                  |
//! | -     | -     | footer tail or plain continuation, final        |
//!
//! When the text ends without a footer, the chunk stops at the last entry
//! separator so that a half-written entry is left for the next read.

use crate::types::{Layout, FOOTER_MARKER};
use tracing::trace;

/// Find `needle` in `haystack` at or after `from`
#[inline]
pub(crate) fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Find the last `needle` in `haystack` that starts at or after `from`
#[inline]
pub(crate) fn rfind_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .rposition(|window| window == needle)
        .map(|pos| pos + from)
}

// ============================================================================
// Boundary classification
// ============================================================================

/// Position of the run marker and footer relative to the scan start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Marker before footer: a complete run
    Run { marker: usize, footer: usize },
    /// Footer before the next marker: the tail of a run began earlier
    OrphanFooter { footer: usize },
    /// Footer with no marker after the scan start
    FinalFooter { footer: usize },
    /// Marker with no footer yet
    OpenRun { marker: usize },
    /// Neither marker nor footer
    Remainder,
}

impl Boundary {
    /// Classify the next boundary from the marker and footer search results
    pub fn classify(marker: Option<usize>, footer: Option<usize>) -> Self {
        match (marker, footer) {
            (Some(marker), Some(footer)) if marker < footer => Boundary::Run { marker, footer },
            (Some(_), Some(footer)) => Boundary::OrphanFooter { footer },
            (None, Some(footer)) => Boundary::FinalFooter { footer },
            (Some(marker), None) => Boundary::OpenRun { marker },
            (None, None) => Boundary::Remainder,
        }
    }
}

// ============================================================================
// Scanner
// ============================================================================

/// A contiguous region of complete thermo entries
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<'a> {
    /// Entry text, without the footer
    pub text: &'a [u8],
    /// Offset in the scanned text of the first byte not consumed by this chunk.
    ///
    /// Lets a caller that stops after any chunk know where to pick up. When
    /// the scanner is drained, [`ChunkScanner::resume`] also covers reads that
    /// end without a chunk.
    pub resume: usize,
    /// Whether no further chunk follows in this text
    pub is_final: bool,
}

/// Iterator over the chunks of one read of a log file
pub struct ChunkScanner<'a> {
    text: &'a [u8],
    layout: Layout,
    /// Where the next search begins; also the resume point once finished
    start: usize,
    finished: bool,
}

impl<'a> ChunkScanner<'a> {
    pub fn new(text: &'a [u8], layout: Layout) -> Self {
        Self {
            text,
            layout,
            start: 0,
            finished: false,
        }
    }

    /// Offset of the first byte that has not been consumed.
    ///
    /// Only final once the iterator is exhausted.
    #[inline]
    pub fn resume(&self) -> usize {
        self.start
    }

    /// Start of the line following the one containing `pos`
    fn line_after(&self, pos: usize) -> Option<usize> {
        find_from(self.text, b"\n", pos).map(|nl| nl + 1)
    }

    /// Split point after the last complete entry at or after `from`.
    ///
    /// Returns `(chunk_end, resume)`; both equal `from` when no entry
    /// separator follows it.
    fn last_entry_boundary(&self, from: usize) -> (usize, usize) {
        match rfind_from(self.text, self.layout.separator(), from) {
            Some(sep) => (sep, sep + 1),
            None => (from, from),
        }
    }

    fn emit(&mut self, begin: usize, end: usize, resume: usize, is_final: bool) -> Chunk<'a> {
        self.start = resume;
        self.finished = is_final;
        Chunk {
            text: &self.text[begin..end.max(begin)],
            resume,
            is_final,
        }
    }

    /// Stop without emitting, leaving the resume point at `resume`
    fn stop(&mut self, resume: usize) -> Option<Chunk<'a>> {
        self.start = resume;
        self.finished = true;
        None
    }
}

impl<'a> Iterator for ChunkScanner<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let start = self.start;
        let marker = find_from(self.text, self.layout.marker(), start);
        let footer = find_from(self.text, FOOTER_MARKER.as_bytes(), start + 1);
        let boundary = Boundary::classify(marker, footer);
        trace!(start, ?boundary, "Chunk boundary");

        match boundary {
            Boundary::Run { marker, footer } => {
                let begin = match self.layout {
                    Layout::Multi => marker,
                    Layout::Single => self.line_after(marker).unwrap_or(footer).min(footer),
                };
                Some(self.emit(begin, footer, footer, false))
            }
            Boundary::OrphanFooter { footer } => Some(self.emit(start, footer, footer, false)),
            Boundary::FinalFooter { footer } => Some(self.emit(start, footer, footer, true)),
            Boundary::OpenRun { marker } => {
                let begin = match self.layout {
                    Layout::Multi => marker,
                    Layout::Single => match self.line_after(marker) {
                        Some(begin) => begin,
                        // header line itself is incomplete
                        None => return self.stop(marker),
                    },
                };
                let (end, resume) = self.last_entry_boundary(begin);
                Some(self.emit(begin, end, resume, true))
            }
            Boundary::Remainder => {
                if self.text[start..].starts_with(FOOTER_MARKER.as_bytes()) {
                    return self.stop(start);
                }
                let (end, resume) = self.last_entry_boundary(start);
                if end == start {
                    return self.stop(start);
                }
                Some(self.emit(start, end, resume, true))
            }
        }
    }
}
