//! The tabular collaborator contract and an in-memory implementation

use crate::error::{Error, Result};
use crate::value::{ColumnType, Scalar};
use ahash::AHashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Contract the formula engine requires from a tabular backend
///
/// The engine only reads through this trait during evaluation; column
/// addition/removal must be serialized by the caller against in-flight
/// evaluations.
pub trait Table {
    /// Number of rows
    fn row_count(&self) -> usize;

    /// Column names in table order
    fn column_names(&self) -> Vec<String>;

    /// Look up a column by name as an ordered value sequence
    fn column(&self, name: &str) -> Option<&[Scalar]>;

    /// Add or replace a named column with a typed value sequence
    ///
    /// The sequence length must equal the row count of a non-empty table.
    fn set_column(&mut self, name: &str, column_type: ColumnType, values: Vec<Scalar>)
        -> Result<()>;

    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Deduplicated head sample of a column's values
    ///
    /// Scans at most `limit` leading rows; nulls and error sentinels are
    /// excluded, order of first appearance is kept.
    fn sample_unique(&self, name: &str, limit: usize) -> Vec<Scalar> {
        let mut out: Vec<Scalar> = Vec::new();
        if let Some(values) = self.column(name) {
            for v in values.iter().take(limit) {
                if matches!(v, Scalar::Null | Scalar::Error(_)) {
                    continue;
                }
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone)]
struct FrameColumn {
    name: String,
    column_type: ColumnType,
    values: Vec<Scalar>,
}

/// In-memory [`Table`] with insertion-ordered, equal-length columns
#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: Vec<FrameColumn>,
    index: AHashMap<String, usize>,
}

impl Frame {
    /// Create a new empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared type of a column, if present
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.index.get(name).map(|&i| self.columns[i].column_type)
    }

    /// Convenience: add a float column
    pub fn push_number_column(&mut self, name: &str, values: &[f64]) {
        let values = values.iter().map(|&n| Scalar::Number(n)).collect();
        // Infallible for fresh test data of matching length
        self.set_column(name, ColumnType::Float, values)
            .unwrap_or_else(|e| panic!("push_number_column {name}: {e}"));
    }

    /// Convenience: add a text column
    pub fn push_text_column(&mut self, name: &str, values: &[&str]) {
        let values = values.iter().map(|&s| Scalar::Text(s.into())).collect();
        self.set_column(name, ColumnType::Str, values)
            .unwrap_or_else(|e| panic!("push_text_column {name}: {e}"));
    }

    /// Convenience: add a boolean column
    pub fn push_bool_column(&mut self, name: &str, values: &[bool]) {
        let values = values.iter().map(|&b| Scalar::Bool(b)).collect();
        self.set_column(name, ColumnType::Bool, values)
            .unwrap_or_else(|e| panic!("push_bool_column {name}: {e}"));
    }
}

impl Table for Frame {
    fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn column(&self, name: &str) -> Option<&[Scalar]> {
        self.index.get(name).map(|&i| self.columns[i].values.as_slice())
    }

    fn set_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        values: Vec<Scalar>,
    ) -> Result<()> {
        if !self.columns.is_empty() && values.len() != self.row_count() {
            return Err(Error::ColumnLengthMismatch {
                name: name.to_string(),
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        match self.index.get(name) {
            Some(&i) => {
                self.columns[i].column_type = column_type;
                self.columns[i].values = values;
            }
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.columns.push(FrameColumn {
                    name: name.to_string(),
                    column_type,
                    values,
                });
            }
        }
        Ok(())
    }
}

/// Generate a fresh column name with the given prefix
///
/// Candidates are `{prefix}_{6 random alphanumerics}`, retried until
/// one does not collide with an existing column.
pub fn unique_column_name(table: &dyn Table, prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let suffix: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        let candidate = format!("{prefix}_{suffix}");
        if !table.has_column(&candidate) {
            return candidate;
        }
    }
}
