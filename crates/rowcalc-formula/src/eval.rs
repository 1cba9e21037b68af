//! Expression evaluation
//!
//! Bottom-up, post-order evaluation against a bound table. Elementwise
//! operators broadcast and recover row-level math errors in place by
//! substituting the matching sentinel; only structural problems (unknown
//! names, incompatible array lengths) abort the evaluation.

use crate::ast::{Expr, OpKind};
use crate::error::{FormulaError, FormulaResult};
use crate::value::{broadcast2, Value};
use rowcalc_core::{is_derived_name, DerivedRegistry, ErrorKind, Scalar, Table};
use std::cmp::Ordering;

/// Read-only view of the collaborators an evaluation binds to
pub struct EvalContext<'a> {
    pub table: &'a dyn Table,
    pub registry: &'a DerivedRegistry,
}

impl<'a> EvalContext<'a> {
    pub fn new(table: &'a dyn Table, registry: &'a DerivedRegistry) -> Self {
        Self { table, registry }
    }

    /// Resolve a reference to its column values
    ///
    /// Derived-prefixed names resolve through the registry to their
    /// materialized target column.
    fn column_value(&self, name: &str) -> FormulaResult<Value> {
        let target = if is_derived_name(name) {
            let descriptor = self
                .registry
                .get(name)
                .ok_or_else(|| FormulaError::UnknownColumn(name.to_string()))?;
            descriptor.target.as_str()
        } else {
            name
        };
        let values = self
            .table
            .column(target)
            .ok_or_else(|| FormulaError::UnknownColumn(name.to_string()))?;
        Ok(Value::Array(values.to_vec()))
    }

    fn custom_column_value(&self, name: &str) -> FormulaResult<Value> {
        let descriptor = self
            .registry
            .get_bracket(name)
            .ok_or_else(|| FormulaError::UnknownColumn(name.to_string()))?;
        let values = self
            .table
            .column(&descriptor.target)
            .ok_or_else(|| FormulaError::UnknownColumn(name.to_string()))?;
        Ok(Value::Array(values.to_vec()))
    }
}

/// Evaluate an expression tree against the bound context
pub fn evaluate(expr: &Expr, ctx: &EvalContext) -> FormulaResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::number(*n)),
        Expr::Bool(b) => Ok(Value::boolean(*b)),
        Expr::Str(s) => Ok(Value::Scalar(Scalar::Text(s.clone()))),
        Expr::ErrorLit(kind) => Ok(Value::error(*kind)),

        Expr::Column(name) => ctx.column_value(name),
        Expr::CustomColumn(name) => ctx.custom_column_value(name),

        Expr::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?;
            evaluate_unary(*op, value)
        }

        Expr::Binary { op, left, right } => {
            let left = evaluate(left, ctx)?;
            let right = evaluate(right, ctx)?;
            evaluate_binary(*op, left, right)
        }

        Expr::Call { func, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, ctx)?);
            }
            func.call(&values)
        }
    }
}

fn evaluate_unary(op: OpKind, value: Value) -> FormulaResult<Value> {
    match op {
        // Unary plus passes every cell through untouched, errors included
        OpKind::Pos => Ok(value),
        OpKind::Neg => crate::value::broadcast_n(&[value], |c| numeric_unary(c[0], |n| -n)),
        OpKind::Percent => {
            crate::value::broadcast_n(&[value], |c| numeric_unary(c[0], |n| n / 100.0))
        }
        other => Err(FormulaError::Evaluation(format!(
            "operator '{}' is not unary",
            other.glyph()
        ))),
    }
}

fn numeric_unary(cell: &Scalar, f: impl Fn(f64) -> f64) -> Scalar {
    if let Some(e) = cell.error() {
        return Scalar::Error(e);
    }
    match cell.as_number() {
        Some(n) => Scalar::Number(f(n)),
        None => Scalar::Error(ErrorKind::Value),
    }
}

fn evaluate_binary(op: OpKind, left: Value, right: Value) -> FormulaResult<Value> {
    match op {
        OpKind::Add => broadcast2(left, right, |l, r| numeric_cell(l, r, |x, y| Scalar::Number(x + y))),
        OpKind::Sub => broadcast2(left, right, |l, r| numeric_cell(l, r, |x, y| Scalar::Number(x - y))),
        OpKind::Mul => broadcast2(left, right, |l, r| numeric_cell(l, r, |x, y| Scalar::Number(x * y))),
        OpKind::Div => broadcast2(left, right, |l, r| numeric_cell(l, r, divide_cell)),
        OpKind::Pow => broadcast2(left, right, |l, r| numeric_cell(l, r, power_cell)),

        OpKind::Eq => compare(left, right, |ord| ord == Ordering::Equal),
        OpKind::Ne => compare(left, right, |ord| ord != Ordering::Equal),
        OpKind::Lt => compare(left, right, |ord| ord == Ordering::Less),
        OpKind::Le => compare(left, right, |ord| ord != Ordering::Greater),
        OpKind::Gt => compare(left, right, |ord| ord == Ordering::Greater),
        OpKind::Ge => compare(left, right, |ord| ord != Ordering::Less),

        OpKind::Concat => broadcast2(left, right, concat_cell),

        // Name-set operators never evaluate to values
        OpKind::Span | OpKind::Union | OpKind::Intersect => Err(FormulaError::Evaluation(format!(
            "operator '{}' applies to references, not values",
            op.glyph()
        ))),

        OpKind::Pos | OpKind::Neg | OpKind::Percent => Err(FormulaError::Evaluation(format!(
            "operator '{}' is not binary",
            op.glyph()
        ))),
    }
}

/// Shared error-propagation and coercion shell for numeric operators
fn numeric_cell(l: &Scalar, r: &Scalar, f: impl Fn(f64, f64) -> Scalar) -> Scalar {
    if let Some(e) = l.error() {
        return Scalar::Error(e);
    }
    if let Some(e) = r.error() {
        return Scalar::Error(e);
    }
    match (l.as_number(), r.as_number()) {
        (Some(x), Some(y)) => f(x, y),
        _ => Scalar::Error(ErrorKind::Value),
    }
}

fn divide_cell(x: f64, y: f64) -> Scalar {
    if y == 0.0 {
        Scalar::Error(ErrorKind::Div0)
    } else {
        Scalar::Number(x / y)
    }
}

fn power_cell(x: f64, y: f64) -> Scalar {
    let result = x.powf(y);
    if result.is_nan() || result.is_infinite() {
        Scalar::Error(ErrorKind::Num)
    } else {
        Scalar::Number(result)
    }
}

fn compare(left: Value, right: Value, f: impl Fn(Ordering) -> bool) -> FormulaResult<Value> {
    broadcast2(left, right, |l, r| {
        if let Some(e) = l.error() {
            return Scalar::Error(e);
        }
        if let Some(e) = r.error() {
            return Scalar::Error(e);
        }
        Scalar::Bool(f(compare_cells(l, r)))
    })
}

/// Spreadsheet-style ordering: numbers < text < booleans, text compares
/// case-insensitively, null behaves as zero
fn compare_cells(left: &Scalar, right: &Scalar) -> Ordering {
    let zero = Scalar::Number(0.0);
    let left = if matches!(left, Scalar::Null) { &zero } else { left };
    let right = if matches!(right, Scalar::Null) { &zero } else { right };

    match (left, right) {
        (Scalar::Number(l), Scalar::Number(r)) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
        (Scalar::Text(l), Scalar::Text(r)) => l.to_lowercase().cmp(&r.to_lowercase()),
        (Scalar::Bool(l), Scalar::Bool(r)) => l.cmp(r),

        (Scalar::Number(_), _) => Ordering::Less,
        (_, Scalar::Number(_)) => Ordering::Greater,
        (Scalar::Text(_), _) => Ordering::Less,
        (_, Scalar::Text(_)) => Ordering::Greater,

        _ => Ordering::Equal,
    }
}

fn concat_cell(l: &Scalar, r: &Scalar) -> Scalar {
    if let Some(e) = l.error() {
        return Scalar::Error(e);
    }
    if let Some(e) = r.error() {
        return Scalar::Error(e);
    }
    Scalar::Text(format!("{}{}", l.render(), r.render()))
}
