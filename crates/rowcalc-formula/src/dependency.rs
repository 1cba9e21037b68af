//! Column dependency resolution
//!
//! Walks a formula's references and expands derived aliases through the
//! registry to the base columns they ultimately read. Resolution keeps an
//! explicit set of aliases currently being expanded, so a cyclic registry
//! fails with the offending alias instead of overflowing the stack.

use crate::error::{FormulaError, FormulaResult};
use crate::parser;
use crate::token::Token;
use ahash::AHashSet;
use rowcalc_core::{is_derived_name, DerivedRegistry, DERIVED_PREFIX};

/// Columns a formula reads, split by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencySet {
    /// Physical table columns referenced directly or through aliases
    pub base_columns: AHashSet<String>,
    /// Derived aliases encountered during expansion, prefix included
    pub derived_columns: AHashSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn union(&mut self, other: DependencySet) {
        self.base_columns.extend(other.base_columns);
        self.derived_columns.extend(other.derived_columns);
    }
}

/// Resolves formula references against a derived-column registry
pub struct DependencyResolver<'a> {
    registry: &'a DerivedRegistry,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(registry: &'a DerivedRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every column a formula depends on, aliases expanded
    pub fn resolve(&self, formula: &str) -> FormulaResult<DependencySet> {
        let mut visiting = AHashSet::new();
        self.resolve_inner(formula, &mut visiting)
    }

    fn resolve_inner(
        &self,
        formula: &str,
        visiting: &mut AHashSet<String>,
    ) -> FormulaResult<DependencySet> {
        let parsed = parser::parse(formula)?;
        let mut deps = DependencySet::new();
        for token in &parsed.tokens {
            match token {
                Token::Column(name) if !is_derived_name(name) => {
                    deps.base_columns.insert(name.clone());
                }
                Token::Column(name) => {
                    deps.union(self.resolve_alias(name, visiting)?);
                }
                Token::CustomColumn(name) => {
                    let alias = format!("{DERIVED_PREFIX}{name}");
                    deps.union(self.resolve_alias(&alias, visiting)?);
                }
                _ => {}
            }
        }
        Ok(deps)
    }

    fn resolve_alias(
        &self,
        alias: &str,
        visiting: &mut AHashSet<String>,
    ) -> FormulaResult<DependencySet> {
        if visiting.contains(alias) {
            return Err(FormulaError::CyclicDerived(alias.to_string()));
        }
        let descriptor = self
            .registry
            .get(alias)
            .ok_or_else(|| FormulaError::UnknownColumn(alias.to_string()))?;

        visiting.insert(alias.to_string());
        // Expansion always reads the normalized text, never the raw entry
        let mut deps = self.resolve_inner(&descriptor.canonical, visiting)?;
        visiting.remove(alias);

        deps.derived_columns.insert(alias.to_string());
        Ok(deps)
    }
}
