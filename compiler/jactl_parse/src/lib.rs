//! Recursive-descent grammar for Jactl scripts.
//!
//! [`ScriptGrammar`] implements [`Grammar`]: it walks the recorder's token
//! stream, allocates semantic nodes and wraps every construct in a marker so
//! the materializer can rebuild a full-fidelity tree.
//!
//! Syntax errors never abort the parse. The offending construct is closed as
//! an error marker ("Unexpected token '<text>': expected <what>") and parsing
//! continues with the next token, so the caller always gets a tree.
//!
//! # Module Structure
//!
//! - `script.rs`: script, package, imports, class declarations
//! - `stmt.rs`: statements, variable and function declarations, types
//! - `expr.rs`: expressions, closures

mod expr;
mod script;
mod stmt;

use jactl_diagnostic::Diagnostic;
use jactl_ir::{Ast, NodeData, NodeId, Span, Token, TokenKind};
use jactl_tree::{Grammar, MarkerId, Recorder, TreeError};

pub(crate) type PResult<T> = Result<T, TreeError>;

/// The default Jactl grammar.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScriptGrammar;

impl Grammar for ScriptGrammar {
    fn parse(
        &self,
        source: &str,
        recorder: &mut Recorder<'_>,
        ast: &mut Ast,
    ) -> Result<NodeId, TreeError> {
        Parser::new(source, recorder, ast).parse_script()
    }
}

/// Parser state for one script.
pub(crate) struct Parser<'a, 't> {
    source: &'a str,
    rec: &'a mut Recorder<'t>,
    ast: &'a mut Ast,
    /// End of the last consumed significant token.
    last_end: u32,
    package: Option<String>,
}

impl<'a, 't> Parser<'a, 't> {
    pub(crate) fn new(source: &'a str, rec: &'a mut Recorder<'t>, ast: &'a mut Ast) -> Self {
        Parser {
            source,
            rec,
            ast,
            last_end: 0,
            package: None,
        }
    }

    // Cursor delegation

    #[inline]
    fn current(&self) -> TokenKind {
        self.rec.current()
    }

    #[inline]
    fn current_token(&self) -> Token {
        self.rec.current_token()
    }

    #[inline]
    fn nth(&self, n: usize) -> TokenKind {
        self.rec.nth(n)
    }

    #[inline]
    fn at(&self, kind: TokenKind) -> bool {
        self.rec.at(kind)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.rec.at_eof()
    }

    fn bump(&mut self) {
        let token = self.rec.current_token();
        self.rec.bump();
        self.last_end = token.span.end;
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn text(&self, token: Token) -> &'a str {
        token.text(self.source)
    }

    /// Offset where the next construct starts.
    fn start(&self) -> u32 {
        self.current_token().offset()
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    // Markers and nodes

    fn mark(&mut self) -> PResult<MarkerId> {
        self.rec.mark()
    }

    fn alloc(&mut self, data: NodeData, span: Span) -> NodeId {
        self.ast.alloc(data, span)
    }

    fn complete(&mut self, marker: MarkerId, node: NodeId) {
        self.rec.complete(marker, node, &*self.ast);
    }

    // Errors

    fn unexpected(&self, what: &str) -> String {
        let token = self.current_token();
        if token.kind == TokenKind::Eof {
            format!("Unexpected end of file: expected {what}")
        } else {
            format!("Unexpected token '{}': expected {what}", self.text(token))
        }
    }

    /// Consume `kind` or record an error without consuming anything.
    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<bool> {
        if self.eat(kind) {
            return Ok(true);
        }
        let m = self.mark()?;
        let message = self.unexpected(what);
        let span = self.current_token().span;
        self.rec.error(m, Diagnostic::syntax(message, span));
        Ok(false)
    }

    /// Record an error covering the current token and skip it.
    fn error_consume(&mut self, what: &str) -> PResult<()> {
        let m = self.mark()?;
        let message = self.unexpected(what);
        let span = self.current_token().span;
        if !self.at_eof() {
            self.bump();
        }
        self.rec.error(m, Diagnostic::syntax(message, span));
        Ok(())
    }
}
