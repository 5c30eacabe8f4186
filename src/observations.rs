//! Columnar container for survey visits.
//!
//! An [`ObservationBatch`] holds named `f64` columns of equal length, one entry per visit
//! (pointing `fieldRA`/`fieldDec` in radians, `fieldID`, `night`, `expMJD`, ...). Stackers read
//! the columns they need and attach their output columns to the same batch.
//!
//! Invariants
//! -----------------
//! * Every column has exactly [`ObservationBatch::len`] entries.
//! * Adding a column with an existing name replaces it.
//!
//! Example
//! -----------------
//! ```rust
//! use skydither::observations::ObservationBatch;
//!
//! let mut batch = ObservationBatch::new();
//! batch.add_column("fieldRA", vec![0.1, 0.2]).unwrap();
//! batch.add_column("fieldDec", vec![-0.3, -0.3]).unwrap();
//! assert_eq!(batch.len(), 2);
//! assert!(batch.has_column("fieldDec"));
//! ```
use std::collections::HashMap;

use ahash::RandomState;

use crate::dither_errors::DitherError;

#[derive(Debug, Clone, Default)]
pub struct ObservationBatch {
    columns: HashMap<String, Vec<f64>, RandomState>,
    len: Option<usize>,
}

impl ObservationBatch {
    /// Create an empty batch, its length is fixed by the first column added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from `(name, values)` pairs.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::ColumnLengthMismatch)` if two columns differ in length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, DitherError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut batch = Self::new();
        for (name, values) in columns {
            batch.add_column(name, values)?;
        }
        Ok(batch)
    }

    /// Number of visits in the batch (0 when no column has been added yet).
    pub fn len(&self) -> usize {
        self.len.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Borrow a column by name.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::MissingColumn)` if the batch has no such column.
    pub fn column(&self, name: &str) -> Result<&[f64], DitherError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DitherError::MissingColumn(name.to_string()))
    }

    /// Attach a column, replacing any column with the same name.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::ColumnLengthMismatch)` if `values` does not match the batch length.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DitherError> {
        let name = name.into();
        match self.len {
            Some(expected) if expected != values.len() => {
                return Err(DitherError::ColumnLengthMismatch {
                    column: name,
                    expected,
                    found: values.len(),
                })
            }
            Some(_) => {}
            None => self.len = Some(values.len()),
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Names of all the columns, sorted alphabetically.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod observations_test {
    use super::*;

    #[test]
    fn test_add_and_read_columns() {
        let mut batch = ObservationBatch::new();
        assert!(batch.is_empty());

        batch.add_column("night", vec![1.0, 1.0, 2.0]).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.column("night").unwrap(), &[1.0, 1.0, 2.0]);
        assert!(!batch.has_column("fieldID"));
    }

    #[test]
    fn test_missing_column() {
        let batch = ObservationBatch::from_columns([("fieldRA", vec![0.0])]).unwrap();
        assert_eq!(
            batch.column("fieldDec"),
            Err(DitherError::MissingColumn("fieldDec".into()))
        );
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = ObservationBatch::from_columns([
            ("fieldRA", vec![0.0, 1.0]),
            ("fieldDec", vec![0.0]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            DitherError::ColumnLengthMismatch {
                column: "fieldDec".into(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_replace_column() {
        let mut batch = ObservationBatch::from_columns([("a", vec![1.0, 2.0])]).unwrap();
        batch.add_column("a", vec![3.0, 4.0]).unwrap();
        assert_eq!(batch.column("a").unwrap(), &[3.0, 4.0]);
        assert_eq!(batch.column_names(), vec!["a"]);
    }
}
