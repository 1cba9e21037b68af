//! Text functions

use crate::error::FormulaResult;
use crate::value::{broadcast_n, Value};
use rowcalc_core::Scalar;

pub fn fn_upper(args: &[Value]) -> FormulaResult<Value> {
    elementwise(args, |s| Scalar::Text(s.to_uppercase()))
}

pub fn fn_lower(args: &[Value]) -> FormulaResult<Value> {
    elementwise(args, |s| Scalar::Text(s.to_lowercase()))
}

pub fn fn_trim(args: &[Value]) -> FormulaResult<Value> {
    elementwise(args, |s| Scalar::Text(s.trim().to_string()))
}

/// LEN(x) counts characters, not bytes
pub fn fn_len(args: &[Value]) -> FormulaResult<Value> {
    elementwise(args, |s| Scalar::Number(s.chars().count() as f64))
}

/// Render each cell to text and apply; error cells pass through
fn elementwise(args: &[Value], f: impl Fn(&str) -> Scalar) -> FormulaResult<Value> {
    broadcast_n(&[args[0].clone()], |cells| {
        let cell = cells[0];
        if let Some(e) = cell.error() {
            return Scalar::Error(e);
        }
        f(&cell.render())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowcalc_core::ErrorKind;

    fn text(s: &str) -> Value {
        Value::Scalar(Scalar::Text(s.to_string()))
    }

    #[test]
    fn test_case_functions() {
        assert_eq!(fn_upper(&[text("abc")]).unwrap(), text("ABC"));
        assert_eq!(fn_lower(&[text("AbC")]).unwrap(), text("abc"));
    }

    #[test]
    fn test_trim_and_len() {
        assert_eq!(fn_trim(&[text("  a b  ")]).unwrap(), text("a b"));
        assert_eq!(fn_len(&[text("héllo")]).unwrap(), Value::number(5.0));
    }

    #[test]
    fn test_numbers_render_before_applying() {
        assert_eq!(fn_len(&[Value::number(42.0)]).unwrap(), Value::number(2.0));
        assert_eq!(fn_upper(&[Value::boolean(true)]).unwrap(), text("TRUE"));
    }

    #[test]
    fn test_error_cells_pass_through() {
        let arr = Value::Array(vec![Scalar::Text("a".into()), Scalar::Error(ErrorKind::Ref)]);
        assert_eq!(
            fn_upper(&[arr]).unwrap(),
            Value::Array(vec![Scalar::Text("A".into()), Scalar::Error(ErrorKind::Ref)])
        );
    }
}
