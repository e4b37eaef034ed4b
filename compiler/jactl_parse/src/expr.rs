//! Expression parsing.
//!
//! Binary operators use a precedence table; each level wraps the already
//! completed left operand with [`Recorder::precede`](jactl_tree::Recorder::precede)
//! once it sees an operator. Every parse function returns the marker of the
//! expression together with its node so callers can wrap it in turn.

use jactl_diagnostic::Diagnostic;
use jactl_ir::{BinaryOp, Literal, NodeData, NodeId, TokenKind, UnaryOp};
use jactl_tree::MarkerId;

use jactl_stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

pub(crate) type Parsed = (MarkerId, NodeId);

/// Binary operators from lowest to highest precedence.
const BINARY_LEVELS: &[&[(TokenKind, BinaryOp)]] = &[
    &[(TokenKind::PipePipe, BinaryOp::Or)],
    &[(TokenKind::AmpAmp, BinaryOp::And)],
    &[
        (TokenKind::EqualEqual, BinaryOp::Eq),
        (TokenKind::BangEqual, BinaryOp::NotEq),
    ],
    &[
        (TokenKind::Less, BinaryOp::Less),
        (TokenKind::LessEqual, BinaryOp::LessEq),
        (TokenKind::Greater, BinaryOp::Greater),
        (TokenKind::GreaterEqual, BinaryOp::GreaterEq),
    ],
    &[
        (TokenKind::Plus, BinaryOp::Add),
        (TokenKind::Minus, BinaryOp::Sub),
    ],
    &[
        (TokenKind::Star, BinaryOp::Mul),
        (TokenKind::Slash, BinaryOp::Div),
        (TokenKind::Percent, BinaryOp::Mod),
    ],
];

impl Parser<'_, '_> {
    /// Parse an expression, assignment included.
    pub(crate) fn parse_expr(&mut self) -> PResult<Parsed> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    pub(crate) fn at_expr_start(&self) -> bool {
        matches!(
            self.current(),
            TokenKind::Ident
                | TokenKind::IntLiteral
                | TokenKind::DecimalLiteral
                | TokenKind::StringLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::LeftParen
                | TokenKind::LeftSquare
                | TokenKind::LeftBrace
                | TokenKind::Bang
                | TokenKind::Minus
                | TokenKind::New
        )
    }

    fn parse_assignment(&mut self) -> PResult<Parsed> {
        if !(self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Equal) {
            return self.parse_binary(0);
        }
        let m = self.mark()?;
        let start = self.start();
        let name = self.text(self.current_token()).to_owned();
        self.bump();
        self.bump();
        let (_, value) = self.parse_expr()?;
        let node = self.alloc(NodeData::VarAssign { name, value }, self.span_from(start));
        self.complete(m, node);
        Ok((m, node))
    }

    fn parse_binary(&mut self, level: usize) -> PResult<Parsed> {
        let Some(ops) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };
        let start = self.start();
        let (mut marker, mut left) = self.parse_binary(level + 1)?;
        while let Some(op) = ops
            .iter()
            .find(|(kind, _)| self.at(*kind))
            .map(|&(_, op)| op)
        {
            let m = self.rec.precede(marker);
            self.bump();
            let (_, right) = self.parse_binary(level + 1)?;
            let node = self.alloc(NodeData::Binary { op, left, right }, self.span_from(start));
            self.complete(m, node);
            marker = m;
            left = node;
        }
        Ok((marker, left))
    }

    fn parse_unary(&mut self) -> PResult<Parsed> {
        let op = match self.current() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            _ => return self.parse_postfix(),
        };
        let m = self.mark()?;
        let start = self.start();
        self.bump();
        let (_, operand) = ensure_sufficient_stack(|| self.parse_unary())?;
        let node = self.alloc(NodeData::PrefixUnary { op, operand }, self.span_from(start));
        self.complete(m, node);
        Ok((m, node))
    }

    fn parse_postfix(&mut self) -> PResult<Parsed> {
        let start = self.start();
        let (mut marker, mut node) = self.parse_primary()?;
        loop {
            let data = match self.current() {
                TokenKind::LeftParen => {
                    let m = self.rec.precede(marker);
                    let args = self.parse_args(TokenKind::RightParen, "')'")?;
                    marker = m;
                    NodeData::Call { callee: node, args }
                }
                TokenKind::Dot => {
                    let m = self.rec.precede(marker);
                    self.bump();
                    let token = self.current_token();
                    let name = if self.expect(TokenKind::Ident, "field or method name")? {
                        self.text(token).to_owned()
                    } else {
                        String::new()
                    };
                    let args = if self.at(TokenKind::LeftParen) {
                        Some(self.parse_args(TokenKind::RightParen, "')'")?)
                    } else {
                        None
                    };
                    marker = m;
                    NodeData::MethodCall {
                        target: node,
                        name,
                        args,
                    }
                }
                _ => return Ok((marker, node)),
            };
            node = self.alloc(data, self.span_from(start));
            self.complete(marker, node);
        }
    }

    /// Comma separated expressions after an opening bracket at the cursor.
    fn parse_args(&mut self, close: TokenKind, what: &str) -> PResult<Vec<NodeId>> {
        self.bump();
        let mut args = Vec::new();
        if !self.at(close) {
            loop {
                args.push(self.parse_expr()?.1);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(close, what)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Parsed> {
        let token = self.current_token();
        let start = token.offset();
        let m = self.mark()?;
        let data = match token.kind {
            TokenKind::IntLiteral => {
                self.bump();
                match parse_int(self.text(token)) {
                    Some(value) => NodeData::Literal(Literal::Int(value)),
                    None => {
                        self.rec.error(
                            m,
                            Diagnostic::syntax("Integer literal too large", token.span),
                        );
                        let node = self.alloc(NodeData::Noop, token.span);
                        return Ok((m, node));
                    }
                }
            }
            TokenKind::DecimalLiteral => {
                self.bump();
                let text = self.text(token).trim_end_matches(['d', 'D']);
                NodeData::Literal(Literal::Decimal(text.to_owned()))
            }
            TokenKind::StringLiteral => {
                self.bump();
                NodeData::Literal(Literal::Str(unquote(self.text(token))))
            }
            TokenKind::True | TokenKind::False => {
                self.bump();
                NodeData::Literal(Literal::Bool(token.kind == TokenKind::True))
            }
            TokenKind::Null => {
                self.bump();
                NodeData::Literal(Literal::Null)
            }
            TokenKind::Ident => {
                self.bump();
                NodeData::Identifier {
                    name: self.text(token).to_owned(),
                }
            }
            TokenKind::LeftParen => {
                self.bump();
                let (_, inner) = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "')'")?;
                self.rec.drop(m);
                return Ok((m, inner));
            }
            TokenKind::LeftSquare => {
                let items = self.parse_args(TokenKind::RightSquare, "']'")?;
                NodeData::ListLiteral { items }
            }
            TokenKind::LeftBrace => return self.parse_closure(m),
            TokenKind::New => {
                self.bump();
                let class_name = self.parse_type()?.name().to_owned();
                let args = if self.at(TokenKind::LeftParen) {
                    self.parse_args(TokenKind::RightParen, "')'")?
                } else {
                    self.expect(TokenKind::LeftParen, "'('")?;
                    Vec::new()
                };
                NodeData::InvokeNew { class_name, args }
            }
            kind => {
                let message = self.unexpected("expression");
                let closer = matches!(
                    kind,
                    TokenKind::RightParen
                        | TokenKind::RightBrace
                        | TokenKind::RightSquare
                        | TokenKind::Semicolon
                        | TokenKind::Eof
                );
                if !closer {
                    self.bump();
                }
                self.rec.error(m, Diagnostic::syntax(message, token.span));
                let node = self.alloc(NodeData::Noop, token.span);
                return Ok((m, node));
            }
        };
        let node = self.alloc(data, self.span_from(start));
        self.complete(m, node);
        Ok((m, node))
    }

    /// `{ [params ->] statements }` with the marker already opened at `{`.
    fn parse_closure(&mut self, m: MarkerId) -> PResult<Parsed> {
        let start = self.start();
        self.bump();
        let params = self.parse_closure_params()?;
        let stmts = self.parse_statements_until(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace, "'}'")?;
        let span = self.span_from(start);
        let body = self.alloc(NodeData::Block { stmts }, span);
        let node = self.alloc(
            NodeData::Closure {
                params,
                body,
                is_block: false,
            },
            span,
        );
        self.complete(m, node);
        Ok((m, node))
    }

    /// Parameters followed by `->`, parsed speculatively: without the arrow
    /// the attempt is rolled back and the closure has no parameters.
    fn parse_closure_params(&mut self) -> PResult<Vec<NodeId>> {
        let kind = self.current();
        if kind != TokenKind::Ident && !kind.is_type_keyword() {
            return Ok(Vec::new());
        }
        let list = self.mark()?;
        let last_end = self.last_end;
        let mut params = Vec::new();
        loop {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if self.eat(TokenKind::Arrow) {
            self.rec.done_list(list);
            Ok(params)
        } else {
            self.rec.rollback(list);
            self.last_end = last_end;
            Ok(Vec::new())
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    text.trim_end_matches(['l', 'L']).parse().ok()
}

/// Strip the quotes of a string literal and resolve simple escapes.
fn unquote(text: &str) -> String {
    let inner = text
        .get(1..text.len().saturating_sub(1))
        .filter(|_| text.len() >= 2)
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
