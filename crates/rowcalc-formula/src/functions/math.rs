//! Numeric functions

use crate::error::FormulaResult;
use crate::value::{broadcast_n, Value};
use rowcalc_core::{ErrorKind, Scalar};

pub fn fn_abs(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| Scalar::Number(n.abs()))
}

/// ROUND(x, [digits]) - digits defaults to 0, half away from zero
pub fn fn_round(args: &[Value]) -> FormulaResult<Value> {
    let padded = [
        args[0].clone(),
        args.get(1).cloned().unwrap_or_else(|| Value::number(0.0)),
    ];
    broadcast_n(&padded, |cells| {
        numeric2(cells[0], cells[1], |x, digits| {
            let factor = 10f64.powi(digits as i32);
            Scalar::Number((x * factor).round() / factor)
        })
    })
}

pub fn fn_sqrt(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| {
        if n < 0.0 {
            Scalar::Error(ErrorKind::Num)
        } else {
            Scalar::Number(n.sqrt())
        }
    })
}

pub fn fn_exp(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| Scalar::Number(n.exp()))
}

pub fn fn_ln(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| {
        if n <= 0.0 {
            Scalar::Error(ErrorKind::Num)
        } else {
            Scalar::Number(n.ln())
        }
    })
}

pub fn fn_log10(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| {
        if n <= 0.0 {
            Scalar::Error(ErrorKind::Num)
        } else {
            Scalar::Number(n.log10())
        }
    })
}

pub fn fn_floor(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| Scalar::Number(n.floor()))
}

pub fn fn_ceiling(args: &[Value]) -> FormulaResult<Value> {
    unary(args, |n| Scalar::Number(n.ceil()))
}

pub fn fn_power(args: &[Value]) -> FormulaResult<Value> {
    binary(args, |x, y| {
        let result = x.powf(y);
        if result.is_nan() || result.is_infinite() {
            Scalar::Error(ErrorKind::Num)
        } else {
            Scalar::Number(result)
        }
    })
}

/// MOD(x, y) - sign follows the divisor, as spreadsheets do
pub fn fn_mod(args: &[Value]) -> FormulaResult<Value> {
    binary(args, |x, y| {
        if y == 0.0 {
            Scalar::Error(ErrorKind::Div0)
        } else {
            Scalar::Number(x - y * (x / y).floor())
        }
    })
}

pub fn fn_min(args: &[Value]) -> FormulaResult<Value> {
    fold(args, f64::min)
}

pub fn fn_max(args: &[Value]) -> FormulaResult<Value> {
    fold(args, f64::max)
}

/// SUM(...) - an empty flattened argument list sums to 0
pub fn fn_sum(args: &[Value]) -> FormulaResult<Value> {
    Ok(match flatten_numbers(args) {
        Ok(numbers) => Value::number(numbers.iter().sum()),
        Err(kind) => Value::error(kind),
    })
}

fn unary(args: &[Value], f: impl Fn(f64) -> Scalar) -> FormulaResult<Value> {
    broadcast_n(&[args[0].clone()], |cells| {
        let cell = cells[0];
        if let Some(e) = cell.error() {
            return Scalar::Error(e);
        }
        match cell.as_number() {
            Some(n) => f(n),
            None => Scalar::Error(ErrorKind::Value),
        }
    })
}

fn binary(args: &[Value], f: impl Fn(f64, f64) -> Scalar) -> FormulaResult<Value> {
    broadcast_n(&[args[0].clone(), args[1].clone()], move |cells| {
        numeric2(cells[0], cells[1], &f)
    })
}

fn numeric2(l: &Scalar, r: &Scalar, f: impl Fn(f64, f64) -> Scalar) -> Scalar {
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

fn fold(args: &[Value], f: impl Fn(f64, f64) -> f64) -> FormulaResult<Value> {
    Ok(match flatten_numbers(args) {
        Ok(numbers) => match numbers.into_iter().reduce(f) {
            Some(n) => Value::number(n),
            None => Value::error(ErrorKind::Value),
        },
        Err(kind) => Value::error(kind),
    })
}

/// Collect all argument cells as numbers, skipping nulls
///
/// An error cell short-circuits the whole aggregate to that sentinel,
/// non-numeric text to #VALUE!; either way the aggregate's result is the
/// sentinel itself, not a failure.
fn flatten_numbers(args: &[Value]) -> Result<Vec<f64>, ErrorKind> {
    let mut out = Vec::new();
    for value in args {
        for cell in value.cells() {
            if matches!(cell, Scalar::Null) {
                continue;
            }
            if let Some(e) = cell.error() {
                return Err(e);
            }
            match cell.as_number() {
                Some(n) => out.push(n),
                None => return Err(ErrorKind::Value),
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_abs_and_round() {
        assert_eq!(fn_abs(&[Value::number(-3.5)]).unwrap(), Value::number(3.5));
        assert_eq!(fn_round(&[Value::number(2.567)]).unwrap(), Value::number(3.0));
        assert_eq!(
            fn_round(&[Value::number(2.567), Value::number(2.0)]).unwrap(),
            Value::number(2.57)
        );
    }

    #[test]
    fn test_sqrt_of_negative_is_num_error() {
        assert_eq!(fn_sqrt(&[Value::number(9.0)]).unwrap(), Value::number(3.0));
        assert_eq!(
            fn_sqrt(&[Value::number(-1.0)]).unwrap(),
            Value::error(ErrorKind::Num)
        );
    }

    #[test]
    fn test_log_domain() {
        assert_eq!(fn_ln(&[Value::number(1.0)]).unwrap(), Value::number(0.0));
        assert_eq!(
            fn_log10(&[Value::number(0.0)]).unwrap(),
            Value::error(ErrorKind::Num)
        );
    }

    #[test]
    fn test_mod_sign_follows_divisor() {
        assert_eq!(
            fn_mod(&[Value::number(-3.0), Value::number(2.0)]).unwrap(),
            Value::number(1.0)
        );
        assert_eq!(
            fn_mod(&[Value::number(3.0), Value::number(0.0)]).unwrap(),
            Value::error(ErrorKind::Div0)
        );
    }

    #[test]
    fn test_unary_broadcasts_and_propagates_errors() {
        let arr = Value::Array(vec![
            Scalar::Number(-1.0),
            Scalar::Error(ErrorKind::Div0),
            Scalar::Text("x".into()),
        ]);
        assert_eq!(
            fn_abs(&[arr]).unwrap(),
            Value::Array(vec![
                Scalar::Number(1.0),
                Scalar::Error(ErrorKind::Div0),
                Scalar::Error(ErrorKind::Value),
            ])
        );
    }

    #[test]
    fn test_aggregates_flatten_and_skip_null() {
        let arr = Value::Array(vec![Scalar::Number(1.0), Scalar::Null, Scalar::Number(5.0)]);
        assert_eq!(
            fn_sum(&[arr.clone(), Value::number(4.0)]).unwrap(),
            Value::number(10.0)
        );
        assert_eq!(fn_min(&[arr.clone()]).unwrap(), Value::number(1.0));
        assert_eq!(fn_max(&[arr]).unwrap(), Value::number(5.0));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let empty = Value::Array(vec![Scalar::Null]);
        assert_eq!(fn_sum(&[empty.clone()]).unwrap(), Value::number(0.0));
        assert_eq!(fn_min(&[empty]).unwrap(), Value::error(ErrorKind::Value));
    }

    #[test]
    fn test_aggregate_short_circuits_to_sentinel() {
        let arr = Value::Array(vec![Scalar::Number(1.0), Scalar::Error(ErrorKind::Na)]);
        assert_eq!(fn_sum(&[arr]).unwrap(), Value::error(ErrorKind::Na));
        let text = Value::Array(vec![Scalar::Number(1.0), Scalar::Text("x".into())]);
        assert_eq!(fn_max(&[text]).unwrap(), Value::error(ErrorKind::Value));
    }
}
