//! Python bindings for the LAMMPS thermo log reader
//!
//! This crate provides PyO3 bindings to expose thermolog-core to Python.

use numpy::ndarray::Array1;
use numpy::IntoPyArray;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyList, PyTuple};
use std::path::PathBuf;
use thermolog_core::{expand_paths, Decompressor, Layout, LogOptions, ThermoError, ThermoLog};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Helper Functions
// ============================================================================

fn to_py_err(e: ThermoError) -> PyErr {
    match e {
        ThermoError::Io(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn vector_to_numpy(py: Python, values: Vec<f64>) -> Py<PyAny> {
    Array1::from_vec(values).into_pyarray(py).into_any().unbind()
}

/// Accept either a whitespace-separated string of paths or a list of paths.
///
/// Every word may be a shell wildcard. A followed log may not exist yet, so
/// in incremental mode a name that matches nothing is kept as given.
fn collect_paths(files: &Bound<'_, PyAny>, incremental: bool) -> PyResult<Vec<PathBuf>> {
    let words = match files.extract::<String>() {
        Ok(text) => text.split_whitespace().map(str::to_string).collect(),
        Err(_) => files.extract::<Vec<String>>()?,
    };

    let paths = expand_paths(&words).map_err(to_py_err)?;
    if paths.is_empty() && incremental {
        return Ok(words.into_iter().map(PathBuf::from).collect());
    }
    Ok(paths)
}

fn keys_from(keys: &Bound<'_, PyTuple>) -> PyResult<Vec<String>> {
    keys.extract::<Vec<String>>()
}

// ============================================================================
// Python Classes
// ============================================================================

/// Python wrapper for ThermoLog
///
/// Args:
///     files: Log file path(s) or wildcards, a list or a whitespace-separated string
///     incremental: Track a single file with next() instead of reading it now
///     gunzip: External program used for .gz files instead of the builtin decoder
#[pyclass(name = "Log")]
pub struct PyLog {
    inner: ThermoLog,
}

#[pymethods]
impl PyLog {
    #[new]
    #[pyo3(signature = (files, incremental=false, gunzip=None))]
    fn new(files: &Bound<'_, PyAny>, incremental: bool, gunzip: Option<String>) -> PyResult<Self> {
        let paths = collect_paths(files, incremental)?;
        let mut options = LogOptions::new();
        if incremental {
            options = options.incremental();
        }
        if let Some(program) = gunzip {
            options = options.with_decompressor(Decompressor::Command(program));
        }

        let inner = ThermoLog::open_with(&paths, options).map_err(to_py_err)?;
        Ok(PyLog { inner })
    }

    /// Read new thermo output; returns the last timestep read or -1
    fn next(&mut self) -> PyResult<i64> {
        let step = self.inner.poll().map_err(to_py_err)?;
        Ok(step.unwrap_or(-1))
    }

    /// Number of vectors
    #[getter]
    fn nvec(&self) -> usize {
        self.inner.nvec()
    }

    /// Length of each vector
    #[getter]
    fn nlen(&self) -> usize {
        self.inner.len()
    }

    /// Vector names in column order
    #[getter]
    fn names(&self) -> Vec<String> {
        self.inner.names().to_vec()
    }

    /// "multi", "one" or None before a header has been seen
    #[getter]
    fn style(&self) -> Option<&'static str> {
        self.inner.layout().map(|layout| match layout {
            Layout::Multi => "multi",
            Layout::Single => "one",
        })
    }

    /// Return one or more vectors; names may be unique abbreviations
    #[pyo3(signature = (*keys))]
    fn get(&self, py: Python<'_>, keys: &Bound<'_, PyTuple>) -> PyResult<Py<PyAny>> {
        let keys = keys_from(keys)?;
        let mut vectors = self.inner.get(&keys).map_err(to_py_err)?;

        if vectors.len() == 1 {
            return Ok(vector_to_numpy(py, vectors.remove(0)));
        }
        let list = PyList::empty(py);
        for vector in vectors {
            list.append(vector_to_numpy(py, vector))?;
        }
        Ok(list.into_any().unbind())
    }

    /// Write all vectors, or the listed ones, to a text file
    #[pyo3(signature = (filename, *keys))]
    fn write(&self, filename: &str, keys: &Bound<'_, PyTuple>) -> PyResult<()> {
        let keys = keys_from(keys)?;
        self.inner.write(filename, &keys).map_err(to_py_err)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Log(vectors={}, entries={}, incremental={})",
            self.inner.nvec(),
            self.inner.len(),
            self.inner.is_incremental()
        )
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Print library log output to stderr
///
/// Args:
///     level: Default level ("error", "warn", "info", "debug", "trace");
///            RUST_LOG takes precedence when set
///
/// Returns:
///     False if logging was already enabled
#[pyfunction]
#[pyo3(signature = (level="info"))]
pub fn enable_logging(level: &str) -> PyResult<bool> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level, "Logging enabled");
    }
    Ok(installed)
}

// ============================================================================
// Module Definition
// ============================================================================

#[pymodule]
pub fn thermolog(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Functions
    m.add_function(wrap_pyfunction!(enable_logging, m)?)?;

    // Classes
    m.add_class::<PyLog>()?;

    Ok(())
}
