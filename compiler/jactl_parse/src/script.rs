//! Script-level constructs: package, imports and class declarations.

use jactl_diagnostic::Diagnostic;
use jactl_ir::{ClassDecl, NameKind, NodeData, NodeId, Span, TokenKind, VarRole};

use crate::stmt::DeclShape;
use crate::{PResult, Parser};

impl Parser<'_, '_> {
    /// Parse a whole script into its implicit script class.
    ///
    /// The script class marker spans the entire file, `Eof` included.
    pub(crate) fn parse_script(&mut self) -> PResult<NodeId> {
        let script = self.mark()?;
        let start = self.start();

        if self.at(TokenKind::Package) {
            self.parse_package()?;
            self.eat(TokenKind::Semicolon);
        }

        let mut imports = Vec::new();
        let mut classes = Vec::new();
        let mut stmts = Vec::new();
        while !self.at_eof() {
            let before = self.current_token();
            match self.current() {
                TokenKind::Import => {
                    imports.push(self.parse_import()?);
                    self.eat(TokenKind::Semicolon);
                }
                TokenKind::Class => classes.push(self.parse_class()?),
                _ => stmts.extend(self.parse_statement()?),
            }
            if self.current_token() == before {
                self.bump();
            }
        }
        let body = self.alloc(NodeData::Block { stmts }, self.span_from(start));
        self.bump();

        let end = self.current_token().span.end;
        let decl = ClassDecl {
            package: self.package.clone(),
            inner_classes: classes,
            imports,
            body: Some(body),
            is_script: true,
            ..ClassDecl::default()
        };
        let node = self.alloc(NodeData::ClassDecl(decl), Span::new(0, end));
        self.complete(script, node);
        Ok(node)
    }

    /// Dotted name such as `a.b.C`, or `None` if not at an identifier.
    pub(crate) fn parse_dotted_path(&mut self) -> Option<String> {
        if !self.at(TokenKind::Ident) {
            return None;
        }
        let mut path = self.text(self.current_token()).to_owned();
        self.bump();
        while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Ident {
            self.bump();
            path.push('.');
            path.push_str(self.text(self.current_token()));
            self.bump();
        }
        Some(path)
    }

    fn parse_package(&mut self) -> PResult<()> {
        self.bump();
        let m = self.mark()?;
        let start = self.start();
        let Some(path) = self.parse_dotted_path() else {
            let message = self.unexpected("package name");
            let span = self.current_token().span;
            self.rec.error(m, Diagnostic::syntax(message, span));
            return Ok(());
        };
        let node = self.alloc(
            NodeData::Name {
                text: path.clone(),
                kind: NameKind::Package,
            },
            self.span_from(start),
        );
        self.complete(m, node);
        self.package = Some(path);
        Ok(())
    }

    fn parse_import(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        self.bump();
        let class_path = match self.parse_dotted_path() {
            Some(path) => path,
            None => {
                self.expect(TokenKind::Ident, "class name")?;
                String::new()
            }
        };
        let alias = if self.eat(TokenKind::As) {
            let token = self.current_token();
            if self.expect(TokenKind::Ident, "alias")? {
                Some(self.text(token).to_owned())
            } else {
                None
            }
        } else {
            None
        };
        let node = self.alloc(
            NodeData::Import { class_path, alias },
            self.span_from(start),
        );
        self.complete(m, node);
        Ok(node)
    }

    /// `class Name [extends Base] { members }`
    pub(crate) fn parse_class(&mut self) -> PResult<NodeId> {
        let m = self.mark()?;
        let start = self.start();
        self.bump();
        let (name, _) = self.parse_name(NameKind::Class)?;
        let base = if self.eat(TokenKind::Extends) {
            Some(self.parse_type()?.name().to_owned())
        } else {
            None
        };

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut inner_classes = Vec::new();
        if self.expect(TokenKind::LeftBrace, "'{'")? {
            while !self.at(TokenKind::RightBrace) && !self.at_eof() {
                let before = self.current_token();
                match self.current() {
                    TokenKind::Class => inner_classes.push(self.parse_class()?),
                    TokenKind::Semicolon => self.bump(),
                    _ => match self.declaration_shape() {
                        Some(DeclShape::Function) => methods.push(self.parse_fun_decl(true)?),
                        Some(DeclShape::Variable) => {
                            fields.push(self.parse_var_decl(VarRole::Field, true)?);
                            self.eat(TokenKind::Semicolon);
                        }
                        None => self.error_consume("field or method declaration")?,
                    },
                }
                if self.current_token() == before {
                    self.bump();
                }
            }
            self.expect(TokenKind::RightBrace, "'}'")?;
        }

        let decl = ClassDecl {
            name,
            package: self.package.clone(),
            base,
            fields,
            methods,
            inner_classes,
            ..ClassDecl::default()
        };
        let node = self.alloc(NodeData::ClassDecl(decl), self.span_from(start));
        self.complete(m, node);
        Ok(node)
    }
}
