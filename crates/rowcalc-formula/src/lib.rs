//! # rowcalc-formula
//!
//! Formula compiler and vectorized evaluator for rowcalc.
//!
//! This crate provides:
//! - Formula lexing and shunting-yard compilation (text → AST)
//! - Elementwise evaluation over table columns (AST → value)
//! - Built-in logical, numeric, and text functions
//! - Derived-column dependency resolution with cycle detection
//!
//! ## Example
//!
//! ```rust,ignore
//! use rowcalc_formula::run;
//!
//! let cells = run("=IF(price>100, price*0.9, price)", &table, &registry)?;
//! ```

pub mod ast;
pub mod builder;
pub mod dependency;
pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

pub use ast::{Expr, OpKind};
pub use builder::AstBuilder;
pub use dependency::{DependencyResolver, DependencySet};
pub use error::{FormulaError, FormulaResult};
pub use eval::{evaluate, EvalContext};
pub use functions::Func;
pub use lexer::Lexer;
pub use parser::{
    add_column, align_rows, canonical, is_formula, parse, rewrite_columns, run,
    AddColumnOptions, Materialized, Parsed,
};
pub use token::Token;
pub use value::{broadcast2, broadcast_n, Value};
