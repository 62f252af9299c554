//! Thermo log sessions
//!
//! A [`ThermoLog`] is either filled once from one or more files (batch) or
//! advanced by repeated [`ThermoLog::poll`] calls on a single growing file
//! (incremental).

use crate::catalog::VectorCatalog;
use crate::entry::parse_chunk;
use crate::layout;
use crate::scanner::ChunkScanner;
use crate::source::{self, Decompressor};
use crate::table::VectorTable;
use crate::types::{Cursor, Layout, Result, Row, ThermoError, Timestep};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

// ============================================================================
// Options
// ============================================================================

/// Options for opening a thermo log
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Track a single file across polls instead of reading it once
    pub incremental: bool,
    /// Decoder for `.gz` files
    pub decompressor: Decompressor,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the log for incremental polling
    pub fn incremental(mut self) -> Self {
        self.incremental = true;
        self
    }

    /// Use a different gzip decoder
    pub fn with_decompressor(mut self, decompressor: Decompressor) -> Self {
        self.decompressor = decompressor;
        self
    }
}

#[derive(Debug)]
enum Mode {
    Batch,
    Incremental { path: PathBuf, cursor: Cursor },
}

// ============================================================================
// Session
// ============================================================================

/// Named thermo vectors read from LAMMPS log output
#[derive(Debug)]
pub struct ThermoLog {
    layout: Option<Layout>,
    catalog: VectorCatalog,
    table: VectorTable,
    mode: Mode,
    decompressor: Decompressor,
}

impl ThermoLog {
    /// Read one or more log files in full
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Self::open_with(paths, LogOptions::default())
    }

    /// Open log files with explicit options.
    ///
    /// In incremental mode exactly one path is accepted and nothing is read
    /// until the first [`poll`](Self::poll).
    pub fn open_with<P: AsRef<Path>>(paths: &[P], options: LogOptions) -> Result<Self> {
        if paths.is_empty() {
            return Err(ThermoError::Config("no log file specified".into()));
        }

        if options.incremental {
            if paths.len() > 1 {
                return Err(ThermoError::Config(
                    "can only incrementally read one log file".into(),
                ));
            }
            return Ok(Self {
                layout: None,
                catalog: VectorCatalog::default(),
                table: VectorTable::new(),
                mode: Mode::Incremental {
                    path: paths[0].as_ref().to_path_buf(),
                    cursor: Cursor::start(),
                },
                decompressor: options.decompressor,
            });
        }

        let paths: Vec<&Path> = paths.iter().map(|p| p.as_ref()).collect();
        Self::read_all(&paths, options.decompressor)
    }

    /// Read every file, then sort by timestep and drop duplicates
    #[instrument(skip_all, fields(files = paths.len(), first = %paths[0].display()))]
    fn read_all(paths: &[&Path], decompressor: Decompressor) -> Result<Self> {
        let first = source::read_from(paths[0], Cursor::start(), &decompressor)?;
        let header = layout::detect(first.bytes())
            .map_err(|e| e.in_file(paths[0]))?
            .filter(|header| !header.names.is_empty())
            .ok_or_else(|| ThermoError::EmptyData(paths[0].to_path_buf()))?;
        let nvec = header.names.len();

        let mut table = VectorTable::new();
        let (rows, _) =
            consume(header.layout, nvec, first.bytes()).map_err(|e| e.in_file(paths[0]))?;
        table.extend(rows);
        drop(first);

        for path in &paths[1..] {
            let text = source::read_from(path, Cursor::start(), &decompressor)?;
            let (rows, _) =
                consume(header.layout, nvec, text.bytes()).map_err(|e| e.in_file(path))?;
            debug!(path = %path.display(), entries = rows.len(), "Read log file");
            table.extend(rows);
        }

        table.sort_and_cull();
        info!(
            entries = table.len(),
            vectors = nvec,
            layout = ?header.layout,
            "Read log entries"
        );

        Ok(Self {
            layout: Some(header.layout),
            catalog: VectorCatalog::new(header.names),
            table,
            mode: Mode::Batch,
            decompressor,
        })
    }

    /// Read thermo output appended since the last poll.
    ///
    /// Returns the timestep of the newest entry read, or `None` when nothing
    /// new is complete yet, including when the file does not exist yet or
    /// has no thermo header.
    #[instrument(skip_all)]
    pub fn poll(&mut self) -> Result<Option<Timestep>> {
        let Mode::Incremental { path, cursor } = &mut self.mode else {
            return Err(ThermoError::Config("cannot read incrementally".into()));
        };

        if self.catalog.is_empty() {
            let text = match source::read_from(path, Cursor::start(), &self.decompressor) {
                Ok(text) => text,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Log not readable yet");
                    return Ok(None);
                }
            };
            match layout::detect(text.bytes()).map_err(|e| e.in_file(path))? {
                Some(header) if !header.names.is_empty() => {
                    info!(
                        path = %path.display(),
                        vectors = header.names.len(),
                        layout = ?header.layout,
                        "Thermo header found"
                    );
                    self.layout = Some(header.layout);
                    self.catalog = VectorCatalog::new(header.names);
                }
                _ => return Ok(None),
            }
        }

        let Some(layout) = self.layout else {
            return Ok(None);
        };
        let text = match source::read_from(path, *cursor, &self.decompressor) {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Log not readable");
                return Ok(None);
            }
        };

        let (rows, resume) =
            consume(layout, self.catalog.len(), text.bytes()).map_err(|e| e.in_file(path))?;
        *cursor = cursor.advance(text.len()).rewind(text.len() - resume);

        if rows.is_empty() {
            return Ok(None);
        }
        self.table.extend(rows);
        Ok(self.table.last_timestep())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of vectors (columns)
    #[inline]
    pub fn nvec(&self) -> usize {
        self.catalog.len()
    }

    /// Number of entries (rows)
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Vector names in column order
    #[inline]
    pub fn names(&self) -> &[String] {
        self.catalog.names()
    }

    /// Detected layout, once a header has been seen
    #[inline]
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    #[inline]
    pub fn is_incremental(&self) -> bool {
        matches!(self.mode, Mode::Incremental { .. })
    }

    /// File tracked by an incremental session
    pub fn path(&self) -> Option<&Path> {
        match &self.mode {
            Mode::Incremental { path, .. } => Some(path),
            Mode::Batch => None,
        }
    }

    /// All parsed rows
    #[inline]
    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    // ========================================================================
    // Vector access
    // ========================================================================

    /// Resolve identifiers (exact name or unique prefix) to column indices
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<usize>> {
        if ids.is_empty() {
            return Err(ThermoError::NoVectors);
        }
        self.catalog.resolve_all(ids)
    }

    /// Values of one vector
    pub fn column(&self, id: &str) -> Result<Vec<f64>> {
        let index = self.catalog.resolve(id)?;
        Ok(self.table.column(index))
    }

    /// Values of several vectors, one sequence per identifier
    pub fn get<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Vec<f64>>> {
        let columns = self.resolve(ids)?;
        Ok(columns.into_iter().map(|i| self.table.column(i)).collect())
    }

    /// Write vectors as space-separated text, one entry per line.
    ///
    /// An empty identifier list writes every vector in catalog order.
    pub fn write<P: AsRef<Path>, S: AsRef<str>>(&self, path: P, ids: &[S]) -> Result<()> {
        let columns = if ids.is_empty() {
            (0..self.nvec()).collect()
        } else {
            self.resolve(ids)?
        };
        crate::writer::write_columns(path.as_ref(), self.table.rows(), &columns)
    }
}

/// Scan one read of a log and parse every complete entry.
///
/// Returns the rows and the offset of the first unconsumed byte.
fn consume(layout: Layout, nvec: usize, text: &[u8]) -> Result<(Vec<Row>, usize)> {
    let mut scanner = ChunkScanner::new(text, layout);
    let mut rows = Vec::new();

    for chunk in scanner.by_ref() {
        let entries = parse_chunk(layout, chunk.text, nvec)?;
        if let Some(last) = entries.last() {
            debug!(
                step = last[0] as Timestep,
                entries = entries.len(),
                "Parsed thermo chunk"
            );
        }
        rows.extend(entries);
    }

    Ok((rows, scanner.resume()))
}
