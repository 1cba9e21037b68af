//! Formula front end
//!
//! Ties the lexer and builder together and exposes the table-facing
//! operations: parse a formula, render its canonical text, evaluate it
//! against a table, materialize the result as a new column, and rewrite
//! its column references.

use crate::builder::AstBuilder;
use crate::error::{FormulaError, FormulaResult};
use crate::eval::{evaluate, EvalContext};
use crate::lexer::Lexer;
use crate::token::Token;
use crate::value::Value;
use ahash::AHashMap;
use lazy_regex::regex_is_match;
use rowcalc_core::{
    is_derived_name, unique_column_name, ColumnType, DerivedRegistry, Scalar, Table,
    DERIVED_PREFIX,
};

/// A parsed formula: the token stream and the expression tree built from it
///
/// The flat tokens survive for canonical re-rendering and reference
/// rewriting; evaluation walks the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub tokens: Vec<Token>,
    pub root: crate::ast::Expr,
}

/// Check whether a text looks like a formula (leading `=` with content)
pub fn is_formula(text: &str) -> bool {
    regex_is_match!(r"^=\s*\S", text.trim_start())
}

/// Parse a formula text into tokens and an expression tree
///
/// Structural errors come back wrapped with the offending formula text.
pub fn parse(text: &str) -> FormulaResult<Parsed> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::NotAFormula(trimmed.to_string()))?;

    let wrap = |e: FormulaError| FormulaError::in_formula(trimmed, e);

    let mut lexer = Lexer::new(body);
    let mut builder = AstBuilder::new();
    while let Some(token) = lexer.next_token().map_err(wrap)? {
        builder.push(token).map_err(wrap)?;
    }
    let (tokens, root) = builder.finish().map_err(wrap)?;
    Ok(Parsed { tokens, root })
}

/// Render the canonical text of a parsed token stream
///
/// Function names upper-case, strings re-quote with doubled quotes, and
/// derived-column references expand in place to the referenced column's
/// own canonical text.
pub fn canonical(tokens: &[Token], registry: &DerivedRegistry) -> FormulaResult<String> {
    let mut out = String::from("=");
    for token in tokens {
        match token {
            Token::Column(name) if is_derived_name(name) => {
                let descriptor = registry
                    .get(name)
                    .ok_or_else(|| FormulaError::UnknownColumn(name.clone()))?;
                out.push_str(descriptor.canonical.trim_start_matches('=').trim());
            }
            Token::CustomColumn(name) => {
                let descriptor = registry
                    .get_bracket(name)
                    .ok_or_else(|| FormulaError::UnknownColumn(name.clone()))?;
                out.push_str(descriptor.canonical.trim_start_matches('=').trim());
            }
            other => out.push_str(&other.lexeme()),
        }
    }
    Ok(out)
}

/// Align an evaluation result to a table's row count
///
/// Scalars repeat on every row; a shorter array tiles cyclically; an
/// empty array yields all-null rows.
pub fn align_rows(value: Value, rows: usize) -> Vec<Scalar> {
    match value {
        Value::Scalar(s) => vec![s; rows],
        Value::Array(a) if a.is_empty() => vec![Scalar::Null; rows],
        Value::Array(a) => a.iter().cloned().cycle().take(rows).collect(),
    }
}

/// Evaluate a formula against a table, one result cell per row
pub fn run(
    text: &str,
    table: &dyn Table,
    registry: &DerivedRegistry,
) -> FormulaResult<Vec<Scalar>> {
    if table.is_empty() {
        return Err(FormulaError::EmptyTable);
    }
    let parsed = parse(text)?;
    let value = evaluate(&parsed.root, &EvalContext::new(table, registry))?;
    log::debug!("evaluated '{}' over {} rows", text.trim(), table.row_count());
    Ok(align_rows(value, table.row_count()))
}

/// Options controlling how [`add_column`] names and types the new column
#[derive(Debug, Clone, Default)]
pub struct AddColumnOptions {
    /// Exact column name; generated from `prefix` when absent
    pub name: Option<String>,
    /// Declared type; inferred from the result values when absent
    pub column_type: Option<ColumnType>,
    /// Prefix for generated names, `custom` when absent
    pub prefix: Option<String>,
    /// Overwrite an existing column of the requested name
    pub force: bool,
}

/// Outcome of materializing a formula as a column
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    pub name: String,
    pub column_type: ColumnType,
    pub formula: String,
    pub canonical: String,
    /// Deduplicated head sample of the stored values
    pub sample: Vec<Scalar>,
}

/// Evaluate a formula and store the result as a table column
pub fn add_column(
    table: &mut dyn Table,
    registry: &DerivedRegistry,
    formula: &str,
    opts: &AddColumnOptions,
) -> FormulaResult<Materialized> {
    if table.is_empty() {
        return Err(FormulaError::EmptyTable);
    }
    let parsed = parse(formula)?;
    let canonical = canonical(&parsed.tokens, registry)?;
    let value = evaluate(&parsed.root, &EvalContext::new(table, registry))?;
    let cells = align_rows(value, table.row_count());

    let name = match &opts.name {
        Some(name) => {
            if table.has_column(name) && !opts.force {
                return Err(rowcalc_core::Error::other(format!(
                    "column '{name}' already exists"
                ))
                .into());
            }
            name.clone()
        }
        None => unique_column_name(table, opts.prefix.as_deref().unwrap_or("custom")),
    };

    let (column_type, cells) = match opts.column_type {
        Some(t) => {
            let cast: Vec<Scalar> = cells
                .iter()
                .map(|c| t.cast(c))
                .collect::<rowcalc_core::Result<_>>()?;
            (t, cast)
        }
        None => (ColumnType::infer(&cells), cells),
    };

    table.set_column(&name, column_type, cells)?;
    log::debug!("materialized '{}' as column '{name}' ({column_type})", formula.trim());

    let sample = table.sample_unique(&name, 50);
    Ok(Materialized {
        name,
        column_type,
        formula: formula.to_string(),
        canonical,
        sample,
    })
}

/// Re-render a formula with its column references renamed
///
/// Embedded line breaks and tabs are stripped before parsing. Every
/// referenced column, bracketed references included, must appear in the
/// map; bracket references map through their prefix-carrying alias.
pub fn rewrite_columns(
    formula: &str,
    renames: &AHashMap<String, String>,
) -> FormulaResult<String> {
    let cleaned: String = formula
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    let parsed = parse(&cleaned)?;

    let mut out = String::from("=");
    for token in &parsed.tokens {
        match token {
            Token::Column(name) => {
                let renamed = renames
                    .get(name)
                    .ok_or_else(|| FormulaError::UnmappedColumn(name.clone()))?;
                out.push_str(renamed);
            }
            Token::CustomColumn(name) => {
                let alias = format!("{DERIVED_PREFIX}{name}");
                let renamed = renames
                    .get(&alias)
                    .ok_or_else(|| FormulaError::UnmappedColumn(alias))?;
                out.push_str(renamed);
            }
            other => out.push_str(&other.lexeme()),
        }
    }
    Ok(out)
}
