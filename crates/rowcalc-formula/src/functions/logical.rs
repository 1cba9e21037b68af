//! Logical functions and value constructors

use crate::error::FormulaResult;
use crate::value::{broadcast_n, Value};
use rowcalc_core::{ErrorKind, Scalar};

/// IF(cond, [x], [y]) - x defaults to 1 and y to 0
pub fn fn_if(args: &[Value]) -> FormulaResult<Value> {
    let padded = [
        args[0].clone(),
        args.get(1).cloned().unwrap_or_else(|| Value::number(1.0)),
        args.get(2).cloned().unwrap_or_else(|| Value::number(0.0)),
    ];
    broadcast_n(&padded, |cells| select(cells[0], cells[1], cells[2]))
}

/// IFS(cond1, val1, cond2, val2, ...) - first truthy condition wins
///
/// An odd trailing condition is paired with the value 0; no match yields
/// #N/A for that row.
pub fn fn_ifs(args: &[Value]) -> FormulaResult<Value> {
    let mut padded = args.to_vec();
    if padded.len() % 2 != 0 {
        padded.push(Value::number(0.0));
    }
    broadcast_n(&padded, |cells| {
        for pair in cells.chunks(2) {
            match truthy(pair[0]) {
                Err(e) => return Scalar::Error(e),
                Ok(true) => return pair[1].clone(),
                Ok(false) => {}
            }
        }
        Scalar::Error(ErrorKind::Na)
    })
}

/// AND(...) - conjunction over every cell of every argument
pub fn fn_and(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Scalar(reduce_flat(args, true, |acc, b| acc && b)))
}

/// OR(...) - disjunction over every cell of every argument
pub fn fn_or(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Scalar(reduce_flat(args, false, |acc, b| acc || b)))
}

/// NOT(x) - elementwise negation
pub fn fn_not(args: &[Value]) -> FormulaResult<Value> {
    broadcast_n(&[args[0].clone()], |cells| match truthy(cells[0]) {
        Err(e) => Scalar::Error(e),
        Ok(b) => Scalar::Bool(!b),
    })
}

pub fn fn_true() -> Value {
    Value::boolean(true)
}

pub fn fn_false() -> Value {
    Value::boolean(false)
}

pub fn fn_null() -> Value {
    Value::Scalar(Scalar::Null)
}

pub fn fn_nan() -> Value {
    Value::number(f64::NAN)
}

/// Flatten all argument cells and fold their truthiness
///
/// Errors win over data, null cells are skipped, any text cell is a
/// #VALUE!, and having no usable cell at all is a #VALUE!.
fn reduce_flat(args: &[Value], init: bool, f: impl Fn(bool, bool) -> bool) -> Scalar {
    let mut acc = init;
    let mut seen = false;
    for value in args {
        for cell in value.cells() {
            if matches!(cell, Scalar::Null) {
                continue;
            }
            match truthy(cell) {
                Ok(b) => {
                    acc = f(acc, b);
                    seen = true;
                }
                Err(e) => return Scalar::Error(e),
            }
        }
    }
    if seen {
        Scalar::Bool(acc)
    } else {
        Scalar::Error(ErrorKind::Value)
    }
}

fn truthy(cell: &Scalar) -> Result<bool, ErrorKind> {
    if let Some(e) = cell.error() {
        return Err(e);
    }
    // Text never supplies a condition, whatever it spells
    if matches!(cell, Scalar::Text(_)) {
        return Err(ErrorKind::Value);
    }
    cell.as_bool().ok_or(ErrorKind::Value)
}

fn select(cond: &Scalar, x: &Scalar, y: &Scalar) -> Scalar {
    match truthy(cond) {
        Err(e) => Scalar::Error(e),
        Ok(true) => x.clone(),
        Ok(false) => y.clone(),
    }
}
