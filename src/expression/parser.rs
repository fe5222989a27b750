//! Recursive-descent parser for node expressions.
//!
//! Precedence, lowest first: `?:`, `||`, `&&`, equality, relational,
//! additive, multiplicative, unary, then member/index postfix.

use serde_json::Value;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::ExpressionError;
use super::lexer::{Lexer, Token, TokenKind};
use super::value::number;

/// Parser for node expression strings.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    /// Parses `source` into an expression tree, refusing to nest deeper
    /// than `max_depth`.
    pub fn parse(source: &str, max_depth: usize) -> Result<Expr, ExpressionError> {
        let tokens = Lexer::tokenize(source)?;
        let mut parser = Parser {
            tokens,
            position: 0,
            depth: 0,
            max_depth,
        };

        if parser.peek() == &TokenKind::Eof {
            return Err(ExpressionError::InvalidSyntax {
                message: "expression is empty".to_string(),
            });
        }
        let expr = parser.parse_conditional()?;
        match parser.peek() {
            TokenKind::Eof => Ok(expr),
            _ => Err(parser.unexpected("end of input")),
        }
    }

    fn peek(&self) -> &TokenKind {
        // The token list always ends with Eof and we never advance past it.
        &self.tokens[self.position].kind
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.position].kind.clone();
        if kind != TokenKind::Eof {
            self.position += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExpressionError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", kind.describe())))
        }
    }

    fn unexpected(&self, expected: &str) -> ExpressionError {
        let token = &self.tokens[self.position];
        match token.kind {
            TokenKind::Eof => ExpressionError::UnexpectedEnd {
                expected: expected.to_string(),
            },
            _ => ExpressionError::UnexpectedToken {
                position: token.position,
                found: token.kind.describe(),
                expected: expected.to_string(),
            },
        }
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ExpressionError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Each operator or accessor folded into a left-leaning chain nests the
    /// tree one level deeper, so it counts against the depth limit too.
    fn fold(&mut self, folds: &mut usize) -> Result<(), ExpressionError> {
        *folds += 1;
        self.enter()
    }

    fn unfold(&mut self, folds: usize) {
        self.depth -= folds;
    }

    fn parse_conditional(&mut self) -> Result<Expr, ExpressionError> {
        self.enter()?;
        let test = self.parse_or()?;
        let expr = if self.eat(&TokenKind::Question) {
            let then = self.parse_conditional()?;
            self.expect(TokenKind::Colon)?;
            let otherwise = self.parse_conditional()?;
            Expr::Conditional(Box::new(test), Box::new(then), Box::new(otherwise))
        } else {
            test
        };
        self.leave();
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_and()?;
        let mut folds = 0;
        while self.eat(&TokenKind::OrOr) {
            self.fold(&mut folds)?;
            let right = self.parse_and()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_equality()?;
        let mut folds = 0;
        while self.eat(&TokenKind::AndAnd) {
            self.fold(&mut folds)?;
            let right = self.parse_equality()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_relational()?;
        let mut folds = 0;
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinaryOp::LooseEq,
                TokenKind::NotEq => BinaryOp::LooseNe,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEqEq => BinaryOp::StrictNe,
                _ => break,
            };
            self.advance();
            self.fold(&mut folds)?;
            let right = self.parse_relational()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_additive()?;
        let mut folds = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            self.fold(&mut folds)?;
            let right = self.parse_additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_multiplicative()?;
        let mut folds = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.fold(&mut folds)?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_unary()?;
        let mut folds = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            self.fold(&mut folds)?;
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.advance();
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExpressionError> {
        let mut expr = self.parse_primary()?;
        let mut folds = 0;
        loop {
            if self.eat(&TokenKind::Dot) {
                let TokenKind::Ident(name) = self.peek().clone() else {
                    return Err(self.unexpected("member name"));
                };
                self.advance();
                self.fold(&mut folds)?;
                expr = Expr::Member(Box::new(expr), name);
            } else if self.eat(&TokenKind::LBracket) {
                self.fold(&mut folds)?;
                let index = self.parse_conditional()?;
                self.expect(TokenKind::RBracket)?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                self.unfold(folds);
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                let value = number(n).map_err(|_| ExpressionError::InvalidSyntax {
                    message: format!("number out of range: {}", n),
                })?;
                Ok(Expr::Literal(value))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Value::String(s)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(match name.as_str() {
                    "true" => Expr::Literal(Value::Bool(true)),
                    "false" => Expr::Literal(Value::Bool(false)),
                    "null" => Expr::Literal(Value::Null),
                    _ => Expr::Identifier(name),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_conditional()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}
