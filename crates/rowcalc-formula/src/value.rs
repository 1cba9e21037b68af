//! Runtime values and broadcasting
//!
//! A value is either a single scalar or a row-aligned array of scalars.
//! Spreadsheet error sentinels ride inside [`Scalar::Error`], so one row
//! position of an array can hold an error while its neighbors hold data.

use crate::error::{FormulaError, FormulaResult};
use rowcalc_core::Scalar;

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Scalar(Scalar::Number(n))
    }

    pub fn boolean(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn error(kind: rowcalc_core::ErrorKind) -> Self {
        Value::Scalar(Scalar::Error(kind))
    }

    /// View as a slice of cells: one for a scalar, all for an array
    pub fn cells(&self) -> &[Scalar] {
        match self {
            Value::Scalar(s) => std::slice::from_ref(s),
            Value::Array(a) => a.as_slice(),
        }
    }

    fn cell_at(&self, i: usize) -> &Scalar {
        match self {
            Value::Scalar(s) => s,
            Value::Array(a) => &a[i],
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

/// Apply a cell function across any mix of scalars and arrays
///
/// Scalars pair against every element of the arrays; all arrays must share
/// one length or the operation fails with a broadcast-length error. With
/// no array argument the result stays scalar.
pub fn broadcast_n<F>(args: &[Value], f: F) -> FormulaResult<Value>
where
    F: Fn(&[&Scalar]) -> Scalar,
{
    let mut len: Option<usize> = None;
    for v in args {
        if let Value::Array(a) = v {
            match len {
                None => len = Some(a.len()),
                Some(n) if n != a.len() => {
                    return Err(FormulaError::Broadcast {
                        left: n,
                        right: a.len(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    match len {
        None => {
            let cells: Vec<&Scalar> = args.iter().map(|v| v.cell_at(0)).collect();
            Ok(Value::Scalar(f(&cells)))
        }
        Some(n) => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                let cells: Vec<&Scalar> = args.iter().map(|v| v.cell_at(i)).collect();
                out.push(f(&cells));
            }
            Ok(Value::Array(out))
        }
    }
}

/// Two-operand convenience over [`broadcast_n`]
pub fn broadcast2<F>(left: Value, right: Value, f: F) -> FormulaResult<Value>
where
    F: Fn(&Scalar, &Scalar) -> Scalar,
{
    broadcast_n(&[left, right], |cells| f(cells[0], cells[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowcalc_core::ErrorKind;

    fn add(l: &Scalar, r: &Scalar) -> Scalar {
        match (l.as_number(), r.as_number()) {
            (Some(x), Some(y)) => Scalar::Number(x + y),
            _ => Scalar::Error(ErrorKind::Value),
        }
    }

    #[test]
    fn test_scalar_scalar_stays_scalar() {
        let v = broadcast2(Value::number(1.0), Value::number(2.0), add).unwrap();
        assert_eq!(v, Value::number(3.0));
    }

    #[test]
    fn test_scalar_broadcasts_over_array() {
        let arr = Value::Array(vec![Scalar::Number(1.0), Scalar::Number(2.0)]);
        let v = broadcast2(arr, Value::number(10.0), add).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![Scalar::Number(11.0), Scalar::Number(12.0)])
        );
    }

    #[test]
    fn test_equal_length_arrays() {
        let a = Value::Array(vec![Scalar::Number(1.0), Scalar::Number(2.0)]);
        let b = Value::Array(vec![Scalar::Number(10.0), Scalar::Number(20.0)]);
        let v = broadcast2(a, b, add).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![Scalar::Number(11.0), Scalar::Number(22.0)])
        );
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let a = Value::Array(vec![Scalar::Number(1.0)]);
        let b = Value::Array(vec![Scalar::Number(1.0), Scalar::Number(2.0)]);
        let err = broadcast2(a, b, add).unwrap_err();
        assert!(matches!(err, FormulaError::Broadcast { left: 1, right: 2 }));
    }

    #[test]
    fn test_empty_arrays_broadcast_to_empty() {
        let a = Value::Array(vec![]);
        let v = broadcast2(a, Value::number(1.0), add).unwrap();
        assert_eq!(v, Value::Array(vec![]));
    }
}
