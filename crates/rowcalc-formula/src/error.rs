//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// Spreadsheet error sentinels (`#DIV/0!` and friends) are *not* here:
/// they are values and flow through evaluation as
/// [`Scalar::Error`](rowcalc_core::Scalar).
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Input does not start with '='
    #[error("Not a formula (missing leading '='): '{0}'")]
    NotAFormula(String),

    /// No token recognizer matched the remaining input
    #[error("Syntax error at offset {position}: unrecognized input '{rest}'")]
    Syntax { position: usize, rest: String },

    /// Malformed token sequence (adjacent operands, wrong node count, ...)
    #[error("Malformed formula: {0}")]
    Malformed(String),

    /// Unbalanced parentheses
    #[error("Unbalanced parentheses")]
    Unbalanced,

    /// Unknown function name, caught before evaluation
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Referenced column or derived alias does not resolve
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Derived column resolution revisited an alias already being resolved
    #[error("Cyclic derived-column dependency involving '{0}'")]
    CyclicDerived(String),

    /// Column name missing from a rewrite map
    #[error("No mapping for column: {0}")]
    UnmappedColumn(String),

    /// Incompatible array lengths in an elementwise operation
    #[error("Cannot broadcast arrays of length {left} and {right}")]
    Broadcast { left: usize, right: usize },

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Evaluation requested against a table with no rows
    #[error("Table has no rows")]
    EmptyTable,

    /// Error from the core table/value layer
    #[error(transparent)]
    Core(#[from] rowcalc_core::Error),

    /// A structural error together with the offending formula text
    #[error("In formula '{formula}': {source}")]
    InFormula {
        formula: String,
        #[source]
        source: Box<FormulaError>,
    },
}

impl FormulaError {
    /// Attach the offending formula text to a structural error
    pub fn in_formula(formula: impl Into<String>, source: FormulaError) -> Self {
        FormulaError::InFormula {
            formula: formula.into(),
            source: Box::new(source),
        }
    }

    /// The underlying error, unwrapping any formula-text attachment
    pub fn root_cause(&self) -> &FormulaError {
        match self {
            FormulaError::InFormula { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
