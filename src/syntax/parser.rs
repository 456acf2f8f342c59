use super::{
    SyntaxError,
    ast::{BinaryOp, Expr, Statement, Target, UnaryOp},
    lexer::{Token, TokenKind},
};
use crate::value::Value;

/// Recursive-descent parser over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses a single expression that must consume the whole input.
    pub fn expression_only(&mut self) -> Result<Expr, SyntaxError> {
        self.skip_newlines();
        let expr = self.expression()?;
        self.skip_newlines();
        self.expect(&TokenKind::Eof)?;
        Ok(expr)
    }

    /// Parses a sequence of assignment statements.
    pub fn statements(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();
        self.skip_newlines();

        while !self.at(&TokenKind::Eof) {
            statements.push(self.statement()?);
            if !self.at(&TokenKind::Eof) {
                self.expect(&TokenKind::Newline)?;
            }
            self.skip_newlines();
        }

        Ok(statements)
    }

    fn statement(&mut self) -> Result<Statement, SyntaxError> {
        let token = self.advance();
        let line = token.line;
        let name = match token.kind {
            TokenKind::Ident(name) => name,
            other => {
                return Err(SyntaxError::new(
                    token.line,
                    token.column,
                    format!("expected assignment, found {}", other.describe()),
                ));
            }
        };

        let target = if self.eat(&TokenKind::LBracket) {
            let key = self.expression()?;
            self.expect(&TokenKind::RBracket)?;
            Target::Subscript { name, key }
        } else {
            Target::Name(name)
        };

        self.expect(&TokenKind::Assign)?;
        let value = self.expression()?;

        Ok(Statement {
            target,
            value,
            line,
        })
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        let then = self.or_expr()?;
        if !self.eat(&TokenKind::If) {
            return Ok(then);
        }
        let condition = self.or_expr()?;
        self.expect(&TokenKind::Else)?;
        let otherwise = self.expression()?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn or_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.and_expr()?;
        while self.eat(&TokenKind::Or) {
            let right = self.and_expr()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.not_expr()?;
        while self.eat(&TokenKind::And) {
            let right = self.not_expr()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(&TokenKind::Not) {
            let operand = self.not_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.arith()?;
        let op = match self.peek_kind() {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.arith()?;
        Ok(binary(op, left, right))
    }

    fn arith(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.term()?;
            left = binary(op, left, right);
        }
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::DoubleSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.postfix(),
        };
        self.advance();

        // i64::MIN has no positive counterpart, so fold it here.
        if op == UnaryOp::Neg {
            if let TokenKind::Int(n) = self.peek_kind() {
                if *n == i64::MIN.unsigned_abs() {
                    self.advance();
                    return Ok(Expr::Literal(Value::Int(i64::MIN)));
                }
            }
        }

        let operand = self.unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.atom()?;
        loop {
            if self.eat(&TokenKind::LParen) {
                let args = self.sequence(&TokenKind::RParen)?.0;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if self.eat(&TokenKind::Dot) {
                let token = self.advance();
                let name = match token.kind {
                    TokenKind::Ident(name) => name,
                    other => {
                        return Err(SyntaxError::new(
                            token.line,
                            token.column,
                            format!("expected attribute name, found {}", other.describe()),
                        ));
                    }
                };
                expr = Expr::Attribute {
                    object: Box::new(expr),
                    name,
                };
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.expression()?;
                self.expect(&TokenKind::RBracket)?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn atom(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.advance();
        let expr = match token.kind {
            TokenKind::Int(n) => {
                let n = i64::try_from(n).map_err(|_| {
                    SyntaxError::new(token.line, token.column, "integer literal out of range")
                })?;
                Expr::Literal(Value::Int(n))
            }
            TokenKind::Float(f) => Expr::Literal(Value::Float(f)),
            TokenKind::Str(mut text) => {
                // Adjacent string literals concatenate.
                while let TokenKind::Str(next) = self.peek_kind() {
                    text.push_str(next);
                    self.advance();
                }
                Expr::Literal(Value::Str(text))
            }
            TokenKind::True => Expr::Literal(Value::Bool(true)),
            TokenKind::False => Expr::Literal(Value::Bool(false)),
            TokenKind::None => Expr::Literal(Value::None),
            TokenKind::Ident(name) => Expr::Name(name),
            TokenKind::LParen => {
                let (mut items, trailing_comma) = self.sequence(&TokenKind::RParen)?;
                if items.len() == 1 && !trailing_comma {
                    items.remove(0)
                } else {
                    Expr::Tuple(items)
                }
            }
            TokenKind::LBracket => Expr::List(self.sequence(&TokenKind::RBracket)?.0),
            TokenKind::LBrace => Expr::Dict(self.dict_entries()?),
            other => {
                return Err(SyntaxError::new(
                    token.line,
                    token.column,
                    format!("expected expression, found {}", other.describe()),
                ));
            }
        };
        Ok(expr)
    }

    /// Parses comma-separated expressions up to `close`, which is consumed.
    /// Also reports whether the last item was followed by a comma.
    fn sequence(&mut self, close: &TokenKind) -> Result<(Vec<Expr>, bool), SyntaxError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;

        while !self.eat(close) {
            items.push(self.expression()?);
            trailing_comma = self.eat(&TokenKind::Comma);
            if !trailing_comma {
                self.expect(close)?;
                break;
            }
        }

        Ok((items, trailing_comma))
    }

    fn dict_entries(&mut self) -> Result<Vec<(Expr, Expr)>, SyntaxError> {
        let mut entries = Vec::new();

        while !self.eat(&TokenKind::RBrace) {
            let key = self.expression()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.expression()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }

        Ok(entries)
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            return Ok(());
        }
        let found = self.peek();
        Err(SyntaxError::new(
            found.line,
            found.column,
            format!(
                "expected {}, found {}",
                kind.describe(),
                found.kind.describe()
            ),
        ))
    }

    fn skip_newlines(&mut self) {
        while self.eat(&TokenKind::Newline) {}
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
