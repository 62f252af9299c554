//! Row storage for parsed thermo entries

use crate::types::{Row, Timestep};

/// Parsed thermo rows in arrival order
#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    rows: Vec<Row>,
}

impl VectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows in the order they were parsed
    pub fn extend(&mut self, rows: Vec<Row>) {
        self.rows.extend(rows);
    }

    /// Sort by timestep and drop every row whose timestep repeats its predecessor's.
    ///
    /// The sort is stable, so among equal timesteps the row parsed first survives.
    pub fn sort_and_cull(&mut self) {
        self.rows.sort_by(|a, b| a[0].total_cmp(&b[0]));
        self.rows.dedup_by(|later, earlier| later[0] == earlier[0]);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Timestep of the most recently stored row
    pub fn last_timestep(&self) -> Option<Timestep> {
        self.rows.last().map(|row| row[0] as Timestep)
    }

    /// Values of one column across all rows
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index]).collect()
    }
}
