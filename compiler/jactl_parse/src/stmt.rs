//! Statements, declarations and types.

use jactl_diagnostic::Diagnostic;
use jactl_ir::{
    FunDeclExpr, NameKind, Node, NodeData, NodeId, TokenKind, TypeRef, VarDeclExpr, VarRole,
};

use jactl_stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

/// What a declaration-looking statement declares.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum DeclShape {
    Variable,
    Function,
}

impl Parser<'_, '_> {
    /// Parse one statement. Returns `None` for statements that produce no
    /// node (a lone `;`).
    pub(crate) fn parse_statement(&mut self) -> PResult<Option<NodeId>> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> PResult<Option<NodeId>> {
        let stmt = match self.current() {
            TokenKind::Semicolon => {
                let m = self.mark()?;
                let start = self.start();
                self.bump();
                let node = self.alloc(NodeData::Noop, self.span_from(start));
                self.complete(m, node);
                return Ok(None);
            }
            TokenKind::LeftBrace => self.parse_block_statement()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Return => self.parse_return()?,
            _ => match self.declaration_shape() {
                Some(DeclShape::Function) => self.parse_fun_decl(false)?,
                Some(DeclShape::Variable) => self.parse_var_decl(VarRole::Local, true)?,
                None if self.at_expr_start() => self.parse_expr_statement()?,
                None => {
                    self.stray_token()?;
                    return Ok(None);
                }
            },
        };
        self.eat(TokenKind::Semicolon);
        Ok(Some(stmt))
    }

    /// Statements up to (not including) `end`.
    pub(crate) fn parse_statements_until(&mut self, end: TokenKind) -> PResult<Vec<NodeId>> {
        let mut stmts = Vec::new();
        while !self.at(end) && !self.at_eof() {
            let before = self.current_token();
            stmts.extend(self.parse_statement()?);
            // The failed statement already reported this token.
            if self.current_token() == before {
                self.bump();
            }
        }
        Ok(stmts)
    }

    /// Number of significant tokens forming a type at the cursor.
    fn type_len(&self) -> Option<usize> {
        let first = self.current();
        if first.is_type_keyword() {
            return Some(1);
        }
        if first != TokenKind::Ident {
            return None;
        }
        let mut len = 1;
        while self.nth(len) == TokenKind::Dot && self.nth(len + 1) == TokenKind::Ident {
            len += 2;
        }
        Some(len)
    }

    /// Whether the cursor is at `Type name` and, if so, what it declares.
    pub(crate) fn declaration_shape(&self) -> Option<DeclShape> {
        let len = self.type_len()?;
        if self.nth(len) != TokenKind::Ident {
            return None;
        }
        if self.nth(len + 1) == TokenKind::LeftParen {
            Some(DeclShape::Function)
        } else {
            Some(DeclShape::Variable)
        }
    }

    /// A braced statement. Without closure parameters the closure the braces
    /// parse as is flagged as a plain block and the statement becomes that
    /// block.
    fn parse_block_statement(&mut self) -> PResult<NodeId> {
        let (closure, node) = self.parse_expr()?;
        let stmt = self.rec.precede(closure);
        let block = match self.ast.get_mut(node) {
            Some(Node {
                data:
                    NodeData::Closure {
                        params,
                        body,
                        is_block,
                    },
                ..
            }) if params.is_empty() => {
                *is_block = true;
                Some(*body)
            }
            _ => None,
        };
        let result = match block {
            Some(body) => body,
            None => {
                let span = self.ast[node].span;
                self.alloc(NodeData::ExprStmt { expr: node }, span)
            }
        };
        self.complete(stmt, result);
        Ok(result)
    }

    /// Statement-level block with its own marker (function bodies).
    pub(crate) fn parse_block(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        let stmts = if self.expect(TokenKind::LeftBrace, "'{'")? {
            let stmts = self.parse_statements_until(TokenKind::RightBrace)?;
            self.expect(TokenKind::RightBrace, "'}'")?;
            stmts
        } else {
            Vec::new()
        };
        let node = self.alloc(NodeData::Block { stmts }, self.span_from(start));
        self.complete(m, node);
        Ok(node)
    }

    /// Branch of an `if`/`while`; an empty statement becomes an empty block.
    fn parse_branch(&mut self) -> PResult<NodeId> {
        if let Some(stmt) = self.parse_statement()? {
            return Ok(stmt);
        }
        let span = self.span_from(self.last_end);
        Ok(self.alloc(NodeData::Block { stmts: Vec::new() }, span))
    }

    fn parse_condition(&mut self) -> PResult<NodeId> {
        self.expect(TokenKind::LeftParen, "'('")?;
        let (_, cond) = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "')'")?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        self.bump();
        let cond = self.parse_condition()?;
        let then_branch = self.parse_branch()?;
        let else_branch = if self.eat(TokenKind::Else) {
            Some(self.parse_branch()?)
        } else {
            None
        };
        let node = self.alloc(
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            },
            self.span_from(start),
        );
        self.complete(m, node);
        Ok(node)
    }

    fn parse_while(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        self.bump();
        let cond = self.parse_condition()?;
        let body = self.parse_branch()?;
        let node = self.alloc(NodeData::While { cond, body }, self.span_from(start));
        self.complete(m, node);
        Ok(node)
    }

    fn parse_return(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        self.bump();
        let value = if self.at_expr_start() {
            Some(self.parse_expr()?.1)
        } else {
            None
        };
        let node = self.alloc(NodeData::Return { value }, self.span_from(start));
        self.complete(m, node);
        Ok(node)
    }

    /// Report a token that cannot start a statement. A closing brace is left
    /// for the enclosing block and `else` for the enclosing `if`.
    fn stray_token(&mut self) -> PResult<()> {
        if !matches!(self.current(), TokenKind::RightBrace | TokenKind::Else) {
            return self.error_consume("expression");
        }
        let m = self.mark()?;
        let message = self.unexpected("expression");
        let span = self.current_token().span;
        self.rec.error(m, Diagnostic::syntax(message, span));
        Ok(())
    }

    fn parse_expr_statement(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        let (_, expr) = self.parse_expr()?;
        let node = self.alloc(NodeData::ExprStmt { expr }, self.span_from(start));
        self.complete(m, node);
        Ok(node)
    }

    /// Declared name. Returns the name and its offset; on error the name is
    /// empty.
    pub(crate) fn parse_name(&mut self, kind: NameKind) -> PResult<(String, u32)> {
        let token = self.current_token();
        if token.kind != TokenKind::Ident {
            self.expect(TokenKind::Ident, "name")?;
            return Ok((String::new(), token.offset()));
        }
        let m = self.mark()?;
        self.bump();
        let text = self.text(token).to_owned();
        let node = self.alloc(
            NodeData::Name {
                text: text.clone(),
                kind,
            },
            token.span,
        );
        self.complete(m, node);
        Ok((text, token.offset()))
    }

    /// A type: builtin keyword, `def`/`var`, or a (dotted) class name.
    pub(crate) fn parse_type(&mut self) -> PResult<TypeRef> {
        let m = self.mark()?;
        let start = self.start();
        let ty = match self.current() {
            TokenKind::Def | TokenKind::Var => TypeRef::Any,
            TokenKind::BooleanType => TypeRef::Boolean,
            TokenKind::IntType => TypeRef::Int,
            TokenKind::LongType => TypeRef::Long,
            TokenKind::DoubleType => TypeRef::Double,
            TokenKind::DecimalType => TypeRef::Decimal,
            TokenKind::StringType => TypeRef::String,
            TokenKind::ListType => TypeRef::List,
            TokenKind::MapType => TypeRef::Map,
            TokenKind::Ident => {
                let path = self.parse_dotted_path().unwrap_or_default();
                let node = self.alloc(NodeData::Type(TypeRef::Class(path.clone())), self.span_from(start));
                self.complete(m, node);
                return Ok(TypeRef::Class(path));
            }
            _ => {
                let message = self.unexpected("type");
                let span = self.current_token().span;
                self.rec.error(m, Diagnostic::syntax(message, span));
                return Ok(TypeRef::Any);
            }
        };
        self.bump();
        let node = self.alloc(NodeData::Type(ty.clone()), self.span_from(start));
        self.complete(m, node);
        Ok(ty)
    }

    /// `Type name [= init]`, or `name [= init]` when `typed` is false.
    pub(crate) fn parse_var_decl(&mut self, role: VarRole, typed: bool) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        let ty = if typed {
            self.parse_type()?
        } else {
            TypeRef::Any
        };
        let name_kind = match role {
            VarRole::Local => NameKind::Variable,
            VarRole::Parameter => NameKind::Parameter,
            VarRole::Field => NameKind::Field,
        };
        let (name, name_offset) = self.parse_name(name_kind)?;
        let init = if self.eat(TokenKind::Equal) {
            Some(self.parse_expr()?.1)
        } else {
            None
        };
        let span = self.span_from(start);
        let decl = self.alloc(
            NodeData::VarDeclExpr(VarDeclExpr {
                name,
                name_offset,
                ty,
                init,
                role,
            }),
            span,
        );
        let node = self.alloc(NodeData::VarDecl { decl }, span);
        self.complete(m, node);
        Ok(node)
    }

    /// `Type name(params) { body }`
    pub(crate) fn parse_fun_decl(&mut self, is_method: bool) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        let return_ty = self.parse_type()?;
        let kind = if is_method {
            NameKind::Method
        } else {
            NameKind::Function
        };
        let (name, name_offset) = self.parse_name(kind)?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = self.span_from(start);
        let decl = self.alloc(
            NodeData::FunDeclExpr(FunDeclExpr {
                name,
                name_offset,
                return_ty,
                params,
                body,
                is_method,
            }),
            span,
        );
        let node = self.alloc(NodeData::FunDecl { decl }, span);
        self.complete(m, node);
        Ok(node)
    }

    /// Parenthesised parameter list, wrapped in a `List` marker.
    fn parse_params(&mut self) -> PResult<Vec<NodeId>> {
        let list = self.mark()?;
        let mut params = Vec::new();
        if self.expect(TokenKind::LeftParen, "'('")? {
            if !self.at(TokenKind::RightParen) {
                loop {
                    params.push(self.parse_param()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen, "')'")?;
        }
        self.rec.done_list(list);
        Ok(params)
    }

    /// A parameter; the type may be omitted.
    pub(crate) fn parse_param(&mut self) -> PResult<NodeId> {
        let untyped = self.at(TokenKind::Ident)
            && matches!(
                self.nth(1),
                TokenKind::Comma | TokenKind::RightParen | TokenKind::Equal | TokenKind::Arrow
            );
        self.parse_var_decl(VarRole::Parameter, !untyped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
