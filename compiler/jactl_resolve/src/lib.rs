//! Scope and class resolution for Jactl scripts.
//!
//! The resolver runs once over a freshly parsed AST. It builds a
//! [`BlockScope`] for every block and class body, describes the classes the
//! file declares, binds identifiers to their declarations and reports the
//! semantic errors it finds along the way:
//!
//! - `Unknown variable '<name>'`
//! - `Variable '<name>' already declared` (also functions and fields)
//! - `Unknown class '<name>'` for base classes, imports, `new` and types
//! - `Cannot convert from <T> to <U>` for literal initialisers
//! - `Non-numeric operand for '<op>' of type <T>`
//!
//! Resolution never fails as a whole: every problem is a [`Diagnostic`].
//! Classes declared in other files are reached through a [`ClassLookup`].
//!
//! [`Diagnostic`]: jactl_diagnostic::Diagnostic

mod class;
mod globals;
mod resolver;
mod scope;
mod types;

pub use class::{
    describe_classes, imports_of, qualify, ClassDescriptor, ClassLookup, FieldDescriptor, Import,
    MethodDescriptor, NoClasses,
};
pub use globals::{Globals, GlobalsError, GlobalsSource, StaticGlobals};
pub use scope::{Binding, BlockScope, Declaration, Resolution};
pub use types::is_assignable;

use jactl_ir::{Ast, FileId, NodeId};

/// Everything a resolver needs for one file.
#[derive(Copy, Clone)]
pub struct ResolveInput<'a> {
    pub file: FileId,
    /// Name of the script class (usually the file name without extension).
    pub script_name: &'a str,
    pub ast: &'a Ast,
    /// The script `ClassDecl`.
    pub root: NodeId,
    pub globals: &'a Globals,
    pub classes: &'a dyn ClassLookup,
}

/// Semantic resolution of a parsed file.
pub trait Resolver: Send + Sync {
    fn resolve(&self, input: ResolveInput<'_>) -> Resolution;
}

/// The default [`Resolver`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ScopeResolver;

impl Resolver for ScopeResolver {
    #[tracing::instrument(level = "debug", skip_all, fields(script = input.script_name))]
    fn resolve(&self, input: ResolveInput<'_>) -> Resolution {
        resolver::Walker::new(input).run()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
