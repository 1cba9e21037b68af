//! Stack-driven shunting-yard compiler
//!
//! Folds the token stream into a single-rooted [`Expr`] while retaining
//! the flat token list for canonical re-rendering. Operator precedence
//! and associativity are honored during reduction; function boundaries
//! carry an argument-count context so arity is validated at fold time.

use crate::ast::{Expr, OpKind};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::Func;
use crate::token::Token;

#[derive(Debug)]
enum StackEntry {
    Op(OpKind),
    /// Open parenthesis or open function-argument list
    Boundary {
        /// Function name when this boundary starts a call
        func: Option<String>,
        /// Output watermark when the boundary opened
        out_start: usize,
        /// Separators seen inside this boundary
        separators: usize,
    },
}

/// Shunting-yard compiler: feed tokens with [`push`](Self::push), then
/// [`finish`](Self::finish) to obtain the token history and the root node.
#[derive(Debug, Default)]
pub struct AstBuilder {
    tokens: Vec<Token>,
    stack: Vec<StackEntry>,
    output: Vec<Expr>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one token
    pub fn push(&mut self, token: Token) -> FormulaResult<()> {
        if token.is_operand() && self.tokens.last().map_or(false, Token::is_operand) {
            return Err(FormulaError::Malformed(
                "two adjacent operands without an operator".into(),
            ));
        }
        self.tokens.push(token.clone());
        match token {
            Token::Error(kind) => self.output.push(Expr::ErrorLit(kind)),
            Token::Number { value, .. } => self.output.push(Expr::Number(value)),
            Token::Bool(b) => self.output.push(Expr::Bool(b)),
            Token::Str(s) => self.output.push(Expr::Str(s)),
            Token::Column(name) => self.output.push(Expr::Column(name)),
            Token::CustomColumn(name) => self.output.push(Expr::CustomColumn(name)),
            Token::Op(OpKind::Percent) => {
                // Postfix, binds tightest: applied to the completed node
                let operand = self.pop_output()?;
                self.output.push(Expr::Unary {
                    op: OpKind::Percent,
                    operand: Box::new(operand),
                });
            }
            Token::Op(op) => {
                while let Some(StackEntry::Op(top)) = self.stack.last() {
                    let tighter = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && !op.is_right_associative());
                    if !tighter {
                        break;
                    }
                    let top = *top;
                    self.stack.pop();
                    self.reduce(top)?;
                }
                self.stack.push(StackEntry::Op(op));
            }
            Token::Open => self.stack.push(StackEntry::Boundary {
                func: None,
                out_start: self.output.len(),
                separators: 0,
            }),
            Token::Func(name) => self.stack.push(StackEntry::Boundary {
                func: Some(name),
                out_start: self.output.len(),
                separators: 0,
            }),
            Token::Separator => {
                self.reduce_to_boundary()?;
                match self.stack.last_mut() {
                    Some(StackEntry::Boundary {
                        func: Some(_),
                        separators,
                        ..
                    }) => *separators += 1,
                    _ => {
                        return Err(FormulaError::Malformed(
                            "separator outside a function call".into(),
                        ))
                    }
                }
            }
            Token::Close => {
                self.reduce_to_boundary()?;
                let Some(StackEntry::Boundary {
                    func,
                    out_start,
                    separators,
                }) = self.stack.pop()
                else {
                    return Err(FormulaError::Unbalanced);
                };
                if let Some(name) = func {
                    self.fold_function(&name, out_start, separators)?;
                }
            }
        }
        Ok(())
    }

    /// Reduce remaining operators and return the token history with the
    /// single root node
    pub fn finish(mut self) -> FormulaResult<(Vec<Token>, Expr)> {
        while let Some(entry) = self.stack.pop() {
            match entry {
                StackEntry::Op(op) => self.reduce(op)?,
                StackEntry::Boundary { .. } => return Err(FormulaError::Unbalanced),
            }
        }
        if self.output.len() != 1 {
            return Err(FormulaError::Malformed(format!(
                "expected a single expression, found {}",
                self.output.len()
            )));
        }
        let root = self.output.pop().ok_or_else(|| {
            FormulaError::Malformed("expected a single expression, found none".into())
        })?;
        Ok((self.tokens, root))
    }

    fn pop_output(&mut self) -> FormulaResult<Expr> {
        self.output
            .pop()
            .ok_or_else(|| FormulaError::Malformed("operator is missing an operand".into()))
    }

    /// Combine completed nodes under an operator
    fn reduce(&mut self, op: OpKind) -> FormulaResult<()> {
        let node = match op.arity() {
            1 => Expr::Unary {
                op,
                operand: Box::new(self.pop_output()?),
            },
            _ => {
                let right = self.pop_output()?;
                let left = self.pop_output()?;
                Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        };
        self.output.push(node);
        Ok(())
    }

    /// Reduce operators down to the nearest boundary marker, which stays
    /// on the stack
    fn reduce_to_boundary(&mut self) -> FormulaResult<()> {
        while let Some(StackEntry::Op(op)) = self.stack.last() {
            let op = *op;
            self.stack.pop();
            self.reduce(op)?;
        }
        Ok(())
    }

    /// Fold a closed function boundary into a call node, resolving the
    /// name and validating arity before any evaluation can run
    fn fold_function(&mut self, name: &str, out_start: usize, separators: usize) -> FormulaResult<()> {
        let args = self.output.split_off(out_start);
        if args.is_empty() && separators > 0 {
            return Err(FormulaError::Malformed(format!(
                "empty argument in call to {}",
                name.to_uppercase()
            )));
        }
        if !args.is_empty() && args.len() != separators + 1 {
            return Err(FormulaError::Malformed(format!(
                "argument list of {} does not match its separators",
                name.to_uppercase()
            )));
        }
        let func = Func::resolve(name);
        func.check_args(args.len())?;
        self.output.push(Expr::Call { func, args });
        Ok(())
    }
}
