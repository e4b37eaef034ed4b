//! The collaborators that turn text into a [`ParsedScript`].

use jactl_diagnostic::Diagnostic;
use jactl_ir::{Ast, FileId, NodeId};
use jactl_lexer::{JactlLexer, Lexer};
use jactl_parse::ScriptGrammar;
use jactl_resolve::{
    describe_classes, ClassDescriptor, ClassLookup, Globals, GlobalsSource, Resolution,
    ResolveInput, Resolver, ScopeResolver, StaticGlobals,
};
use jactl_tree::{materialize, CancellationToken, Grammar, Materialized, Recorder, TreeError};
use tracing::{debug, error, warn};

use crate::{IdeError, ParsedScript, SourceFile};

/// Message for files outside every source root.
pub const OUTSIDE_SOURCE_ROOTS: &str = "File exists outside configured source roots";

/// Lexer, grammar, resolver and globals source used for every file.
pub struct Frontend {
    lexer: Box<dyn Lexer>,
    grammar: Box<dyn Grammar>,
    resolver: Box<dyn Resolver>,
    globals: Box<dyn GlobalsSource>,
}

impl Default for Frontend {
    fn default() -> Self {
        Frontend::new(StaticGlobals::default())
    }
}

impl Frontend {
    /// The default Jactl collaborators with the given globals.
    pub fn new(globals: impl GlobalsSource + 'static) -> Self {
        Frontend {
            lexer: Box::new(JactlLexer),
            grammar: Box::new(ScriptGrammar),
            resolver: Box::new(ScopeResolver),
            globals: Box::new(globals),
        }
    }

    #[must_use]
    pub fn with_lexer(mut self, lexer: impl Lexer + 'static) -> Self {
        self.lexer = Box::new(lexer);
        self
    }

    #[must_use]
    pub fn with_grammar(mut self, grammar: impl Grammar + 'static) -> Self {
        self.grammar = Box::new(grammar);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Lex, parse and materialize `text`.
    fn parse(
        &self,
        file: FileId,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<(Ast, NodeId, Materialized), TreeError> {
        let tokens = self.lexer.tokenize(text);
        let mut ast = Ast::new();
        let mut recorder = Recorder::new(&tokens, cancel.clone());
        let root = self.grammar.parse(text, &mut recorder, &mut ast)?;
        let recording = recorder.finish()?;
        let index = materialize(file, &recording, &ast)?;
        debug!(
            tokens = tokens.len(),
            markers = recording.markers.len(),
            nodes = ast.len(),
            keys = index.nodes.len(),
            "materialized"
        );
        Ok((ast, root, index))
    }

    /// Build a fully resolved script.
    ///
    /// Internal consistency failures produce a degraded script; only
    /// cancellation is an error.
    #[tracing::instrument(level = "debug", skip_all, fields(?file, script = %source.name))]
    pub fn build(
        &self,
        file: FileId,
        text: &str,
        source: &SourceFile,
        classes: &dyn ClassLookup,
        cancel: &CancellationToken,
    ) -> Result<ParsedScript, IdeError> {
        let (ast, root, index) = match self.parse(file, text, cancel) {
            Ok(parsed) => parsed,
            Err(TreeError::Cancelled) => return Err(IdeError::Cancelled),
            Err(err) => {
                error!(?file, %err, "materialization failed");
                return Ok(ParsedScript::degraded(file, text));
            }
        };

        let (globals, globals_error) = match self.globals.load() {
            Ok(globals) => (globals, None),
            Err(err) => {
                warn!(%err, "globals unavailable");
                (Globals::new(), Some(Diagnostic::configuration(err.to_string(), 0)))
            }
        };

        let outside_roots = source.package.is_none();
        let resolution = if outside_roots {
            Resolution::default()
        } else {
            self.resolver.resolve(ResolveInput {
                file,
                script_name: &source.name,
                ast: &ast,
                root,
                globals: &globals,
                classes,
            })
        };

        let mut script = ParsedScript::new(file, text, ast, root, index, resolution);
        if outside_roots {
            script.push_diagnostic(Diagnostic::configuration(OUTSIDE_SOURCE_ROOTS, 0));
        }
        if let Some(diagnostic) = globals_error {
            script.set_globals_error(diagnostic);
        }
        Ok(script)
    }

    /// Describe the classes `text` declares without resolving anything.
    pub fn describe(&self, file: FileId, text: &str, script_name: &str) -> Vec<ClassDescriptor> {
        match self.parse(file, text, &CancellationToken::new()) {
            Ok((ast, root, _)) => describe_classes(file, script_name, &ast, root),
            Err(err) => {
                warn!(?file, %err, "cannot describe classes");
                Vec::new()
            }
        }
    }
}
