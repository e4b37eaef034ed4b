use std::fmt;

use jactl_ir::Span;

/// Where a diagnostic came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    /// Lexical or syntactic error recorded by an error marker.
    Syntax,
    /// Semantic error reported by the resolver.
    Resolution,
    /// Precondition fault such as an invalid globals source.
    Configuration,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Syntax => write!(f, "syntax"),
            DiagnosticKind::Resolution => write!(f, "resolution"),
            DiagnosticKind::Configuration => write!(f, "configuration"),
        }
    }
}

/// A user-facing error message anchored at a span.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    pub fn resolution(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Resolution, message, span)
    }

    /// Configuration errors have no natural location; callers re-anchor them.
    pub fn configuration(message: impl Into<String>, offset: u32) -> Self {
        Self::new(DiagnosticKind::Configuration, message, Span::point(offset))
    }

    /// Offset the diagnostic is reported at.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.span.start
    }

    /// Same diagnostic, re-anchored at `offset`.
    #[must_use]
    pub fn anchored_at(mut self, offset: u32) -> Self {
        let len = self.span.len();
        self.span = Span::new(offset, offset.saturating_add(len));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests;
