//! Formula lexer
//!
//! Recognizers are tried in a fixed priority order against the
//! whitespace-trimmed start of the remaining input: error sentinel,
//! number, string, column, custom column, operator, separator, function
//! call, parenthesis. Order matters: the sentinel/number/string patterns
//! must run before the greedy column pattern, and a column match falls
//! through when followed by `(` or `.` (a call, not a bare reference).
//!
//! A recognizer miss is an ordinary `None`; a syntax error surfaces only
//! once every recognizer has missed, citing the unmatched position.

use crate::ast::OpKind;
use crate::error::{FormulaError, FormulaResult};
use crate::token::Token;
use lazy_regex::regex;
use rowcalc_core::ErrorKind;

/// Incremental tokenizer over one formula expression (text after `=`)
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Whether the last emitted token can end a value, which makes a
    /// following `+`/`-` binary rather than prefix
    binary_allowed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            binary_allowed: false,
        }
    }

    /// Byte offset of the next unconsumed character
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Emit the next token, `None` at end of input
    pub fn next_token(&mut self) -> FormulaResult<Option<Token>> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return Ok(None);
        }
        let rest = &self.input[self.pos..];
        match self.recognize(rest) {
            Some((token, len)) => {
                self.pos += len;
                self.binary_allowed =
                    token.is_operand() || matches!(token, Token::Close | Token::Op(OpKind::Percent));
                Ok(Some(token))
            }
            None => Err(FormulaError::Syntax {
                position: self.pos,
                rest: rest.to_string(),
            }),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.input[self.pos..].chars().next() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn recognize(&self, rest: &str) -> Option<(Token, usize)> {
        match_error(rest)
            .or_else(|| match_number(rest))
            .or_else(|| match_string(rest))
            .or_else(|| match_column(rest))
            .or_else(|| match_custom_column(rest))
            .or_else(|| self.match_operator(rest))
            .or_else(|| match_separator(rest))
            .or_else(|| match_function(rest))
            .or_else(|| match_parenthesis(rest))
    }

    fn match_operator(&self, rest: &str) -> Option<(Token, usize)> {
        for (glyph, op) in [("<=", OpKind::Le), (">=", OpKind::Ge), ("<>", OpKind::Ne)] {
            if rest.starts_with(glyph) {
                return Some((Token::Op(op), glyph.len()));
            }
        }
        let op = match rest.chars().next()? {
            '+' if self.binary_allowed => OpKind::Add,
            '+' => OpKind::Pos,
            '-' if self.binary_allowed => OpKind::Sub,
            '-' => OpKind::Neg,
            '*' => OpKind::Mul,
            '/' => OpKind::Div,
            '^' => OpKind::Pow,
            '%' => OpKind::Percent,
            '&' => OpKind::Concat,
            '<' => OpKind::Lt,
            '>' => OpKind::Gt,
            '=' => OpKind::Eq,
            ':' => OpKind::Span,
            _ => return None,
        };
        Some((Token::Op(op), 1))
    }
}

/// True when a just-matched literal continues as an identifier or is the
/// left side of a `:` span, which disqualifies the literal interpretation
fn continues_as_name(after: &str) -> bool {
    if let Some(c) = after.chars().next() {
        if c.is_alphanumeric() || c == '_' || c == '.' {
            return true;
        }
    }
    after.trim_start().starts_with(':')
}

fn match_error(rest: &str) -> Option<(Token, usize)> {
    let m = regex!(r"^(?i)#(?:NULL!|DIV/0!|VALUE!|REF!|NUM!|NAME\?|N/A)").find(rest)?;
    let kind = ErrorKind::parse(m.as_str())?;
    Some((Token::Error(kind), m.end()))
}

fn match_number(rest: &str) -> Option<(Token, usize)> {
    let m = regex!(r"^[0-9]+(?:\.[0-9]+)?(?:[eE][+-][0-9]+)?|^(?i:TRUE|FALSE)").find(rest)?;
    let text = m.as_str();
    let after = &rest[m.end()..];
    let upper = text.to_uppercase();
    if upper == "TRUE" || upper == "FALSE" {
        // TRUE( / FALSE( are the zero-arg function forms
        if after.starts_with('(') || continues_as_name(after) {
            return None;
        }
        return Some((Token::Bool(upper == "TRUE"), m.end()));
    }
    if continues_as_name(after) {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    Some((
        Token::Number {
            text: text.to_string(),
            value,
        },
        m.end(),
    ))
}

fn match_string(rest: &str) -> Option<(Token, usize)> {
    let caps = regex!(r#"^"((?:""|[^"])*)"|^'((?:''|[^'])*)'"#).captures(rest)?;
    let full = caps.get(0)?;
    let content = match caps.get(1) {
        Some(g) => g.as_str().replace("\"\"", "\""),
        None => caps.get(2)?.as_str().replace("''", "'"),
    };
    Some((Token::Str(content), full.end()))
}

fn match_column(rest: &str) -> Option<(Token, usize)> {
    let m = regex!(r"^\w+").find(rest)?;
    let after = &rest[m.end()..];
    if after.starts_with('(') || after.starts_with('.') {
        return None;
    }
    Some((Token::Column(m.as_str().to_string()), m.end()))
}

fn match_custom_column(rest: &str) -> Option<(Token, usize)> {
    let caps = regex!(r"^\[(\w+)\]").captures(rest)?;
    let full = caps.get(0)?;
    let after = &rest[full.end()..];
    if after.starts_with('(') || after.starts_with('.') {
        return None;
    }
    Some((
        Token::CustomColumn(caps.get(1)?.as_str().to_string()),
        full.end(),
    ))
}

fn match_separator(rest: &str) -> Option<(Token, usize)> {
    rest.starts_with(',').then(|| (Token::Separator, 1))
}

fn match_function(rest: &str) -> Option<(Token, usize)> {
    let caps = regex!(r"^@?([A-Za-z_][\w.]*)\(").captures(rest)?;
    Some((
        Token::Func(caps.get(1)?.as_str().to_string()),
        caps.get(0)?.end(),
    ))
}

fn match_parenthesis(rest: &str) -> Option<(Token, usize)> {
    match rest.chars().next()? {
        '(' => Some((Token::Open, 1)),
        ')' => Some((Token::Close, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        while let Some(t) = lexer.next_token().unwrap() {
            out.push(t);
        }
        out
    }

    fn num(text: &str) -> Token {
        Token::Number {
            text: text.into(),
            value: text.parse().unwrap(),
        }
    }

    #[test]
    fn test_arithmetic_tokens() {
        assert_eq!(
            tokenize("1+2*3"),
            vec![
                num("1"),
                Token::Op(OpKind::Add),
                num("2"),
                Token::Op(OpKind::Mul),
                num("3"),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(
            tokenize("  1 +\n 2 "),
            vec![num("1"), Token::Op(OpKind::Add), num("2")]
        );
    }

    #[test]
    fn test_error_sentinel_precedes_column() {
        assert_eq!(tokenize("#DIV/0!"), vec![Token::Error(ErrorKind::Div0)]);
        assert_eq!(tokenize("#n/a"), vec![Token::Error(ErrorKind::Na)]);
        assert_eq!(tokenize("#NAME?"), vec![Token::Error(ErrorKind::Name)]);
    }

    #[test]
    fn test_true_false_literals_vs_function() {
        assert_eq!(tokenize("TRUE"), vec![Token::Bool(true)]);
        assert_eq!(tokenize("false"), vec![Token::Bool(false)]);
        assert_eq!(
            tokenize("TRUE()"),
            vec![Token::Func("TRUE".into()), Token::Close]
        );
        // TRUEX is a column name, not a boolean followed by junk
        assert_eq!(tokenize("TRUEX"), vec![Token::Column("TRUEX".into())]);
    }

    #[test]
    fn test_number_does_not_split_identifier() {
        assert_eq!(tokenize("123abc"), vec![Token::Column("123abc".into())]);
        assert_eq!(tokenize("1.5"), vec![num("1.5")]);
        assert_eq!(tokenize("2E+3"), vec![num("2E+3")]);
    }

    #[test]
    fn test_column_rejected_before_call_paren() {
        assert_eq!(
            tokenize("SUM(a)"),
            vec![
                Token::Func("SUM".into()),
                Token::Column("a".into()),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_custom_column() {
        assert_eq!(
            tokenize("[score]+1"),
            vec![
                Token::CustomColumn("score".into()),
                Token::Op(OpKind::Add),
                num("1"),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(tokenize(r#""a""b""#), vec![Token::Str("a\"b".into())]);
        assert_eq!(tokenize("'it''s'"), vec![Token::Str("it's".into())]);
    }

    #[test]
    fn test_unary_vs_binary_minus() {
        assert_eq!(
            tokenize("-1-2"),
            vec![
                Token::Op(OpKind::Neg),
                num("1"),
                Token::Op(OpKind::Sub),
                num("2"),
            ]
        );
        assert_eq!(
            tokenize("(a)-1"),
            vec![
                Token::Open,
                Token::Column("a".into()),
                Token::Close,
                Token::Op(OpKind::Sub),
                num("1"),
            ]
        );
        assert_eq!(
            tokenize("2*-3"),
            vec![
                num("2"),
                Token::Op(OpKind::Mul),
                Token::Op(OpKind::Neg),
                num("3"),
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            tokenize("a<>b"),
            vec![
                Token::Column("a".into()),
                Token::Op(OpKind::Ne),
                Token::Column("b".into()),
            ]
        );
        assert_eq!(
            tokenize("a<=1"),
            vec![Token::Column("a".into()), Token::Op(OpKind::Le), num("1")]
        );
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let mut lexer = Lexer::new("1+!");
        assert!(lexer.next_token().unwrap().is_some());
        assert!(lexer.next_token().unwrap().is_some());
        let err = lexer.next_token().unwrap_err();
        match err {
            FormulaError::Syntax { position, rest } => {
                assert_eq!(position, 2);
                assert_eq!(rest, "!");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_unicode_column_names() {
        assert_eq!(tokenize("收入"), vec![Token::Column("收入".into())]);
    }
}
