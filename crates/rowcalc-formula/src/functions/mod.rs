//! Built-in functions
//!
//! A closed enumeration resolved at compile time: no global registry, and
//! an unrecognized name becomes [`Func::Unknown`], which fails arity
//! checking with the attempted name before evaluation ever runs.

pub mod logical;
pub mod math;
pub mod text;

use crate::error::{FormulaError, FormulaResult};
use crate::value::Value;

/// The supported function set
#[derive(Debug, Clone, PartialEq)]
pub enum Func {
    // Logical
    If,
    Ifs,
    And,
    Or,
    Not,
    True,
    False,
    Null,
    Nan,

    // Math
    Abs,
    Round,
    Sqrt,
    Exp,
    Ln,
    Log10,
    Floor,
    Ceiling,
    Power,
    Mod,
    Min,
    Max,
    Sum,

    // Text
    Upper,
    Lower,
    Len,
    Trim,

    /// Unresolved name, kept for error reporting
    Unknown(String),
}

impl Func {
    /// Resolve an uppercased function name
    pub fn resolve(name: &str) -> Func {
        match name.to_uppercase().as_str() {
            "IF" => Func::If,
            "IFS" => Func::Ifs,
            "AND" => Func::And,
            "OR" => Func::Or,
            "NOT" => Func::Not,
            "TRUE" => Func::True,
            "FALSE" => Func::False,
            "NULL" => Func::Null,
            "NAN" => Func::Nan,
            "ABS" => Func::Abs,
            "ROUND" => Func::Round,
            "SQRT" => Func::Sqrt,
            "EXP" => Func::Exp,
            "LN" => Func::Ln,
            "LOG10" => Func::Log10,
            "FLOOR" => Func::Floor,
            "CEILING" => Func::Ceiling,
            "POWER" => Func::Power,
            "MOD" => Func::Mod,
            "MIN" => Func::Min,
            "MAX" => Func::Max,
            "SUM" => Func::Sum,
            "UPPER" => Func::Upper,
            "LOWER" => Func::Lower,
            "LEN" => Func::Len,
            "TRIM" => Func::Trim,
            other => Func::Unknown(other.to_string()),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Func::If => "IF",
            Func::Ifs => "IFS",
            Func::And => "AND",
            Func::Or => "OR",
            Func::Not => "NOT",
            Func::True => "TRUE",
            Func::False => "FALSE",
            Func::Null => "NULL",
            Func::Nan => "NAN",
            Func::Abs => "ABS",
            Func::Round => "ROUND",
            Func::Sqrt => "SQRT",
            Func::Exp => "EXP",
            Func::Ln => "LN",
            Func::Log10 => "LOG10",
            Func::Floor => "FLOOR",
            Func::Ceiling => "CEILING",
            Func::Power => "POWER",
            Func::Mod => "MOD",
            Func::Min => "MIN",
            Func::Max => "MAX",
            Func::Sum => "SUM",
            Func::Upper => "UPPER",
            Func::Lower => "LOWER",
            Func::Len => "LEN",
            Func::Trim => "TRIM",
            Func::Unknown(name) => name,
        }
    }

    /// Accepted argument count as (min, max); `None` means unlimited
    pub fn arg_range(&self) -> (usize, Option<usize>) {
        match self {
            Func::If => (1, Some(3)),
            Func::Ifs => (1, None),
            Func::And | Func::Or => (0, None),
            Func::Not => (1, Some(1)),
            Func::True | Func::False | Func::Null | Func::Nan => (0, Some(0)),
            Func::Abs
            | Func::Sqrt
            | Func::Exp
            | Func::Ln
            | Func::Log10
            | Func::Floor
            | Func::Ceiling => (1, Some(1)),
            Func::Round => (1, Some(2)),
            Func::Power | Func::Mod => (2, Some(2)),
            Func::Min | Func::Max | Func::Sum => (1, None),
            Func::Upper | Func::Lower | Func::Len | Func::Trim => (1, Some(1)),
            Func::Unknown(_) => (0, None),
        }
    }

    /// Validate a supplied argument count; also where unknown names fail
    pub fn check_args(&self, supplied: usize) -> FormulaResult<()> {
        if let Func::Unknown(name) = self {
            return Err(FormulaError::UnknownFunction(name.clone()));
        }
        let (min, max) = self.arg_range();
        if supplied < min {
            return Err(FormulaError::ArgumentCount {
                function: self.name().to_string(),
                expected: format!("at least {min}"),
                actual: supplied,
            });
        }
        if let Some(max) = max {
            if supplied > max {
                return Err(FormulaError::ArgumentCount {
                    function: self.name().to_string(),
                    expected: format!("at most {max}"),
                    actual: supplied,
                });
            }
        }
        Ok(())
    }

    /// Dispatch on already-evaluated arguments
    pub fn call(&self, args: &[Value]) -> FormulaResult<Value> {
        match self {
            Func::If => logical::fn_if(args),
            Func::Ifs => logical::fn_ifs(args),
            Func::And => logical::fn_and(args),
            Func::Or => logical::fn_or(args),
            Func::Not => logical::fn_not(args),
            Func::True => Ok(logical::fn_true()),
            Func::False => Ok(logical::fn_false()),
            Func::Null => Ok(logical::fn_null()),
            Func::Nan => Ok(logical::fn_nan()),
            Func::Abs => math::fn_abs(args),
            Func::Round => math::fn_round(args),
            Func::Sqrt => math::fn_sqrt(args),
            Func::Exp => math::fn_exp(args),
            Func::Ln => math::fn_ln(args),
            Func::Log10 => math::fn_log10(args),
            Func::Floor => math::fn_floor(args),
            Func::Ceiling => math::fn_ceiling(args),
            Func::Power => math::fn_power(args),
            Func::Mod => math::fn_mod(args),
            Func::Min => math::fn_min(args),
            Func::Max => math::fn_max(args),
            Func::Sum => math::fn_sum(args),
            Func::Upper => text::fn_upper(args),
            Func::Lower => text::fn_lower(args),
            Func::Len => text::fn_len(args),
            Func::Trim => text::fn_trim(args),
            Func::Unknown(name) => Err(FormulaError::UnknownFunction(name.clone())),
        }
    }
}
