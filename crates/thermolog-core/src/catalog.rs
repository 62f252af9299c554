//! Vector catalog and name resolution

use crate::types::{Result, ThermoError};
use std::collections::HashMap;

/// Ordered vector names with an exact-name index
#[derive(Debug, Clone, Default)]
pub struct VectorCatalog {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl VectorCatalog {
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column of an exact name
    pub fn index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolve an identifier by exact name, then by unique prefix
    pub fn resolve(&self, id: &str) -> Result<usize> {
        if let Some(i) = self.index(id) {
            return Ok(i);
        }

        let mut matches = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(id))
            .map(|(i, _)| i);

        match (matches.next(), matches.next()) {
            (Some(i), None) => Ok(i),
            (None, _) => Err(ThermoError::NotFound(id.to_string())),
            (Some(_), Some(_)) => Err(ThermoError::NotUnique(id.to_string())),
        }
    }

    /// Resolve several identifiers, in order
    pub fn resolve_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<usize>> {
        ids.iter().map(|id| self.resolve(id.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VectorCatalog {
        VectorCatalog::new(
            ["Step", "Time", "PE", "KE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_exact_and_prefix() {
        let cat = catalog();
        assert_eq!(cat.resolve("Time").unwrap(), 1);
        assert_eq!(cat.resolve("K").unwrap(), 3);
        assert_eq!(cat.resolve("P").unwrap(), 2);
    }

    #[test]
    fn test_exact_wins_over_prefix() {
        let cat = VectorCatalog::new(vec!["Press".into(), "Pres".into(), "P".into()]);
        assert_eq!(cat.resolve("Pres").unwrap(), 1);
        assert!(matches!(cat.resolve("Pr"), Err(ThermoError::NotUnique(_))));
    }

    #[test]
    fn test_unresolved() {
        let cat = catalog();
        let err = cat.resolve("Temp").unwrap_err();
        assert!(matches!(err, ThermoError::NotFound(ref id) if id == "Temp"));

        let cat = VectorCatalog::new(vec!["Step".into(), "PotEng".into(), "Press".into()]);
        let err = cat.resolve("P").unwrap_err();
        assert!(matches!(err, ThermoError::NotUnique(ref id) if id == "P"));
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let cat = catalog();
        assert_eq!(cat.resolve_all(&["KE", "Step", "PE"]).unwrap(), vec![3, 0, 2]);
    }
}
