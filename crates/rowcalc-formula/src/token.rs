//! Lexical tokens
//!
//! One explicit variant per token kind; each carries only the fields that
//! kind needs. Tokens are ephemeral: the lexer yields them one at a time
//! and the builder folds them into the expression tree, keeping the flat
//! list only for canonical re-rendering.

use crate::ast::OpKind;
use rowcalc_core::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Spreadsheet error sentinel literal, e.g. `#DIV/0!`
    Error(ErrorKind),
    /// Numeric literal; keeps the matched text for re-rendering
    Number { text: String, value: f64 },
    /// `TRUE`/`FALSE` keyword literal
    Bool(bool),
    /// String literal, stored unescaped
    Str(String),
    /// Bare column reference
    Column(String),
    /// Bracketed `[name]` derived-column reference
    CustomColumn(String),
    Op(OpKind),
    /// Argument separator `,`
    Separator,
    /// Function call start; the matched text includes the opening paren
    Func(String),
    Open,
    Close,
}

impl Token {
    /// Operands are the value-producing tokens; two of them may never be
    /// adjacent in a well-formed stream.
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Token::Error(_)
                | Token::Number { .. }
                | Token::Bool(_)
                | Token::Str(_)
                | Token::Column(_)
                | Token::CustomColumn(_)
        )
    }

    /// Canonical lexeme of this token
    ///
    /// Function names are upper-cased and re-opened with `(`, strings are
    /// re-quoted with doubled-quote escaping.
    pub fn lexeme(&self) -> String {
        match self {
            Token::Error(e) => e.as_str().to_string(),
            Token::Number { text, .. } => text.clone(),
            Token::Bool(true) => "TRUE".to_string(),
            Token::Bool(false) => "FALSE".to_string(),
            Token::Str(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Token::Column(name) => name.clone(),
            Token::CustomColumn(name) => format!("[{name}]"),
            Token::Op(op) => op.glyph().to_string(),
            Token::Separator => ",".to_string(),
            Token::Func(name) => format!("{}(", name.to_uppercase()),
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_classification() {
        assert!(Token::Number {
            text: "1".into(),
            value: 1.0
        }
        .is_operand());
        assert!(Token::Column("a".into()).is_operand());
        assert!(Token::CustomColumn("a".into()).is_operand());
        assert!(!Token::Op(OpKind::Add).is_operand());
        assert!(!Token::Open.is_operand());
        assert!(!Token::Func("IF".into()).is_operand());
    }

    #[test]
    fn test_lexeme_rendering() {
        assert_eq!(Token::Str("say \"hi\"".into()).lexeme(), "\"say \"\"hi\"\"\"");
        assert_eq!(Token::Func("if".into()).lexeme(), "IF(");
        assert_eq!(Token::CustomColumn("score".into()).lexeme(), "[score]");
        assert_eq!(Token::Error(ErrorKind::Div0).lexeme(), "#DIV/0!");
    }
}
