//! Derived columns: formula-defined virtual columns and their registry

use crate::error::{Error, Result};
use crate::value::ColumnType;
use ahash::AHashMap;

/// Fixed prefix that marks a column name as a derived-column alias
pub const DERIVED_PREFIX: &str = "derived_";

/// Check whether a column name follows the derived-column naming convention
pub fn is_derived_name(name: &str) -> bool {
    name.starts_with(DERIVED_PREFIX)
}

/// Descriptor of one derived column
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    /// Prefix-carrying alias, the unique registry key
    pub alias: String,
    /// Physical column the formula materializes into
    pub target: String,
    /// Raw formula text as entered
    pub formula: String,
    /// Canonical formula text (normalized casing/quoting, references expanded)
    pub canonical: String,
    /// Declared type of the materialized column
    pub column_type: ColumnType,
    /// Disabled columns stay registered but are ignored by callers
    pub enabled: bool,
}

impl DerivedColumn {
    pub fn new(
        alias: impl Into<String>,
        target: impl Into<String>,
        formula: impl Into<String>,
        canonical: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            alias: alias.into(),
            target: target.into(),
            formula: formula.into(),
            canonical: canonical.into(),
            column_type,
            enabled: true,
        }
    }
}

/// Registry mapping derived-column aliases to their descriptors
#[derive(Debug, Clone, Default)]
pub struct DerivedRegistry {
    columns: AHashMap<String, DerivedColumn>,
}

impl DerivedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a derived column; the alias must be unused
    pub fn insert(&mut self, column: DerivedColumn) -> Result<()> {
        if self.columns.contains_key(&column.alias) {
            return Err(Error::DuplicateAlias(column.alias));
        }
        self.columns.insert(column.alias.clone(), column);
        Ok(())
    }

    /// Register or replace a derived column
    pub fn upsert(&mut self, column: DerivedColumn) {
        self.columns.insert(column.alias.clone(), column);
    }

    /// Look up by prefix-carrying alias
    pub fn get(&self, alias: &str) -> Option<&DerivedColumn> {
        self.columns.get(alias)
    }

    /// Look up by the bare name a bracketed `[name]` reference carries
    pub fn get_bracket(&self, name: &str) -> Option<&DerivedColumn> {
        self.columns.get(&format!("{DERIVED_PREFIX}{name}"))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
