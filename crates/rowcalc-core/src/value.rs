//! Scalar values, spreadsheet error sentinels, and column types

use crate::error::{Error, Result};
use std::fmt;

/// Spreadsheet error sentinels
///
/// These are computed values, not failures: they flow through elementwise
/// operations and appear in result arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid reference
    Ref,
    /// #NAME? - Unrecognized name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
}

impl ErrorKind {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Null => "#NULL!",
            ErrorKind::Div0 => "#DIV/0!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Name => "#NAME?",
            ErrorKind::Num => "#NUM!",
            ErrorKind::Na => "#N/A",
        }
    }

    /// Parse an error string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#NULL!" => Some(ErrorKind::Null),
            "#DIV/0!" => Some(ErrorKind::Div0),
            "#VALUE!" => Some(ErrorKind::Value),
            "#REF!" => Some(ErrorKind::Ref),
            "#NAME?" => Some(ErrorKind::Name),
            "#NUM!" => Some(ErrorKind::Num),
            "#N/A" => Some(ErrorKind::Na),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single cell value
///
/// Error sentinels are ordinary values so that a single row position of an
/// array result can hold one.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
    Error(ErrorKind),
}

impl Scalar {
    /// Convert to number, if possible
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Bool(true) => Some(1.0),
            Scalar::Bool(false) => Some(0.0),
            Scalar::Null => Some(0.0),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Error(_) => None,
        }
    }

    /// Convert to boolean truthiness, if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Number(n) => Some(*n != 0.0),
            Scalar::Null => Some(false),
            Scalar::Text(s) => {
                let upper = s.to_uppercase();
                if upper == "TRUE" {
                    Some(true)
                } else if upper == "FALSE" {
                    Some(false)
                } else {
                    None
                }
            }
            Scalar::Error(_) => None,
        }
    }

    /// Render for display and concatenation
    pub fn render(&self) -> String {
        match self {
            Scalar::Number(n) => {
                // Integral values render without a fractional part
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Scalar::Text(s) => s.clone(),
            Scalar::Bool(true) => "TRUE".to_string(),
            Scalar::Bool(false) => "FALSE".to_string(),
            Scalar::Null => String::new(),
            Scalar::Error(e) => e.to_string(),
        }
    }

    /// Check if this is an error sentinel
    pub fn is_error(&self) -> bool {
        matches!(self, Scalar::Error(_))
    }

    /// Get the error sentinel if this is one
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Scalar::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// Declared type of a materialized column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Str,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::Str => "str",
        }
    }

    /// Infer the narrowest type that fits a value slice
    ///
    /// Nulls and error sentinels do not participate; an empty or
    /// all-null slice infers as `Str`.
    pub fn infer(values: &[Scalar]) -> ColumnType {
        let mut saw_number = false;
        let mut saw_fraction = false;
        let mut saw_bool = false;
        let mut saw_text = false;
        for v in values {
            match v {
                Scalar::Number(n) => {
                    saw_number = true;
                    if n.fract() != 0.0 || n.abs() >= 1e15 {
                        saw_fraction = true;
                    }
                }
                Scalar::Bool(_) => saw_bool = true,
                Scalar::Text(_) => saw_text = true,
                Scalar::Null | Scalar::Error(_) => {}
            }
        }
        match (saw_text, saw_number, saw_bool) {
            (true, _, _) => ColumnType::Str,
            (false, true, false) if !saw_fraction => ColumnType::Int,
            (false, true, false) => ColumnType::Float,
            (false, false, true) => ColumnType::Bool,
            (false, true, true) => ColumnType::Float,
            (false, false, false) => ColumnType::Str,
        }
    }

    /// Cast a scalar to this column type
    ///
    /// Nulls and error sentinels pass through unchanged.
    pub fn cast(&self, value: &Scalar) -> Result<Scalar> {
        if matches!(value, Scalar::Null | Scalar::Error(_)) {
            return Ok(value.clone());
        }
        let fail = || Error::UnsupportedCast {
            value: value.render(),
            target: self.as_str().to_string(),
        };
        match self {
            ColumnType::Int => {
                let n = value.as_number().ok_or_else(fail)?;
                if n.fract() != 0.0 {
                    return Err(fail());
                }
                Ok(Scalar::Number(n))
            }
            ColumnType::Float => Ok(Scalar::Number(value.as_number().ok_or_else(fail)?)),
            ColumnType::Bool => Ok(Scalar::Bool(value.as_bool().ok_or_else(fail)?)),
            ColumnType::Str => Ok(Scalar::Text(value.render())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
