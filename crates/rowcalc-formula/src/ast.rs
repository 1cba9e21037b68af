//! Expression tree and operator types

use crate::functions::Func;
use rowcalc_core::ErrorKind;

/// Operators, unary and binary
///
/// `Pos`/`Neg` are the unary forms of `+`/`-`, distinct tokens from their
/// binary forms. `Span`/`Union`/`Intersect` operate on name sets during
/// reference resolution and are rejected by value evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    // Unary
    Pos,
    Neg,
    Percent,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Text
    Concat,

    // Name-set
    Span,
    Union,
    Intersect,
}

impl OpKind {
    /// Source glyph, used for canonical re-rendering
    pub fn glyph(&self) -> &'static str {
        match self {
            OpKind::Add | OpKind::Pos => "+",
            OpKind::Sub | OpKind::Neg => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Pow => "^",
            OpKind::Percent => "%",
            OpKind::Eq => "=",
            OpKind::Ne => "<>",
            OpKind::Lt => "<",
            OpKind::Le => "<=",
            OpKind::Gt => ">",
            OpKind::Ge => ">=",
            OpKind::Concat => "&",
            OpKind::Span => ":",
            OpKind::Union => ",",
            OpKind::Intersect => " ",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            OpKind::Eq | OpKind::Ne | OpKind::Lt | OpKind::Le | OpKind::Gt | OpKind::Ge => 1,
            OpKind::Concat => 2,
            OpKind::Add | OpKind::Sub => 3,
            OpKind::Mul | OpKind::Div => 4,
            OpKind::Pow => 5,
            OpKind::Pos | OpKind::Neg | OpKind::Percent => 6,
            OpKind::Span | OpKind::Union | OpKind::Intersect => 7,
        }
    }

    /// Exponent is the only right-associative binary operator; prefix
    /// operators stack right-associatively as well.
    pub fn is_right_associative(&self) -> bool {
        matches!(self, OpKind::Pow | OpKind::Pos | OpKind::Neg)
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, OpKind::Pos | OpKind::Neg | OpKind::Percent)
    }

    /// Number of output nodes this operator consumes
    pub fn arity(&self) -> usize {
        if self.is_unary() {
            1
        } else {
            2
        }
    }
}

/// Formula expression tree
///
/// Produced by the [`AstBuilder`](crate::builder::AstBuilder); function
/// calls carry an already-resolved [`Func`] with validated arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    Number(f64),
    Bool(bool),
    Str(String),
    ErrorLit(ErrorKind),

    // References
    /// Physical column reference (may carry the derived prefix)
    Column(String),
    /// Bracketed `[name]` derived-column reference, bare alias
    CustomColumn(String),

    // Operators
    Unary {
        op: OpKind,
        operand: Box<Expr>,
    },
    Binary {
        op: OpKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // Function call
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}
