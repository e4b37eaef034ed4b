//! Resolver output and the position queries answered from it.

use jactl_diagnostic::Diagnostic;
use jactl_ir::{Ast, NodeId, TypeRef};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::class::{candidates, ClassDescriptor, ClassLookup, Import};

/// A lexical scope: a block, or the member scope of a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockScope {
    pub enclosing: Option<NodeId>,
    /// Fully-qualified name of the class whose code this block belongs to.
    pub owning_class: String,
    /// `VarDeclExpr` nodes in declaration order.
    pub variables: Vec<NodeId>,
    /// `FunDeclExpr` nodes in declaration order.
    pub functions: Vec<NodeId>,
}

/// What an identifier refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// A local variable, parameter or function, by its declaration node.
    Local(NodeId),
    Global(String),
    Field { class: String, name: String },
    Method { class: String, name: String },
    Class(String),
}

/// A name visible at some position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    Variable { name: String, ty: TypeRef, decl: NodeId },
    Function { name: String, decl: NodeId },
    Field { name: String, ty: TypeRef, class: String },
    Method { name: String, class: String },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable { name, .. }
            | Declaration::Function { name, .. }
            | Declaration::Field { name, .. }
            | Declaration::Method { name, .. } => name,
        }
    }
}

/// Everything the resolver learned about one file.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    pub package: Option<String>,
    /// Fully-qualified name of the script class.
    pub script_class: String,
    /// Scopes keyed by their `Block` (or `ClassDecl`) node.
    pub blocks: FxHashMap<NodeId, BlockScope>,
    /// Innermost scope of every resolved node.
    pub node_block: FxHashMap<NodeId, NodeId>,
    /// Identifier, assignment and `new` nodes to what they name.
    pub bindings: FxHashMap<NodeId, Binding>,
    /// Classes declared in this file, the script class first.
    pub classes: Vec<ClassDescriptor>,
    pub imports: Vec<Import>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn local_class(&self, fq_name: &str) -> Option<&ClassDescriptor> {
        self.classes.iter().find(|c| c.fq_name == fq_name)
    }

    /// A class declared here or, failing that, known to `lookup`.
    pub fn find_class(&self, fq_name: &str, lookup: &dyn ClassLookup) -> Option<ClassDescriptor> {
        self.local_class(fq_name)
            .cloned()
            .or_else(|| lookup.lookup(fq_name))
    }

    /// The class and its base classes, nearest first. Stops at the first
    /// unknown base or at a cycle.
    pub fn class_chain(&self, fq_name: &str, lookup: &dyn ClassLookup) -> Vec<ClassDescriptor> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut next = Some(fq_name.to_owned());
        while let Some(fq) = next {
            if !seen.insert(fq.clone()) {
                break;
            }
            let Some(class) = self.find_class(&fq, lookup) else {
                break;
            };
            next = class.base.clone();
            chain.push(class);
        }
        chain
    }

    /// The class and its enclosing classes, innermost first.
    pub fn enclosing_classes(&self, fq_name: &str, lookup: &dyn ClassLookup) -> Vec<String> {
        let mut out = Vec::new();
        let mut next = Some(fq_name.to_owned());
        while let Some(fq) = next {
            if out.contains(&fq) {
                break;
            }
            next = self.find_class(&fq, lookup).and_then(|c| c.enclosing);
            out.push(fq);
        }
        out
    }

    /// Resolve a class name as written inside `from` to a known class.
    pub fn resolve_class_name(
        &self,
        written: &str,
        from: &str,
        lookup: &dyn ClassLookup,
    ) -> Option<ClassDescriptor> {
        let enclosing = self.enclosing_classes(from, lookup);
        candidates(written, &enclosing, self.package.as_deref(), &self.imports)
            .iter()
            .find_map(|fq| self.find_class(fq, lookup))
    }

    pub fn scope_of(&self, node: NodeId) -> Option<&BlockScope> {
        self.blocks.get(self.node_block.get(&node)?)
    }

    /// The class owning the code at `node`.
    pub fn owning_class(&self, node: NodeId, lookup: &dyn ClassLookup) -> Option<ClassDescriptor> {
        let scope = self.scope_of(node)?;
        self.find_class(&scope.owning_class, lookup)
    }

    /// Whether `name` is a simple name or class path introduced by an import.
    pub fn is_imported(&self, name: &str) -> bool {
        self.imports
            .iter()
            .any(|i| i.name() == name || i.class_path == name)
    }

    /// Variables and functions visible at `node`, innermost scope first,
    /// followed by the fields and then the methods of the owning class and
    /// its base classes. The nearest declaration of a name hides the rest.
    ///
    /// Variables count only if declared before `location`; functions are
    /// visible throughout their block.
    pub fn visible_declarations(
        &self,
        ast: &Ast,
        node: NodeId,
        location: u32,
        lookup: &dyn ClassLookup,
    ) -> Vec<Declaration> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut add = |decl: Declaration| {
            if seen.insert(decl.name().to_owned()) {
                out.push(decl);
            }
        };

        let mut owner = None;
        let mut block = self.node_block.get(&node).copied();
        while let Some(id) = block {
            let Some(scope) = self.blocks.get(&id) else {
                break;
            };
            owner.get_or_insert_with(|| scope.owning_class.clone());
            for &var in &scope.variables {
                let Some(decl) = ast.var_decl(var) else {
                    continue;
                };
                if ast[var].span.start < location {
                    add(Declaration::Variable {
                        name: decl.name.clone(),
                        ty: decl.ty.clone(),
                        decl: var,
                    });
                }
            }
            for &fun in &scope.functions {
                if let Some(decl) = ast.fun_decl(fun) {
                    add(Declaration::Function {
                        name: decl.name.clone(),
                        decl: fun,
                    });
                }
            }
            block = scope.enclosing;
        }

        let Some(owner) = owner else {
            return out;
        };
        let chain = self.class_chain(&owner, lookup);
        for class in &chain {
            for field in &class.fields {
                add(Declaration::Field {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    class: class.fq_name.clone(),
                });
            }
        }
        for class in &chain {
            for method in &class.methods {
                add(Declaration::Method {
                    name: method.name.clone(),
                    class: class.fq_name.clone(),
                });
            }
        }
        out
    }

    /// Classes visible at `node`: the owning class and its enclosing classes
    /// with their base classes and all their inner classes, then imported
    /// classes, then the classes of the same package.
    pub fn visible_classes(&self, node: NodeId, lookup: &dyn ClassLookup) -> Vec<ClassDescriptor> {
        let Some(scope) = self.scope_of(node) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut add = |class: ClassDescriptor| {
            if seen.insert(class.fq_name.clone()) {
                out.push(class);
            }
        };

        for fq in self.enclosing_classes(&scope.owning_class, lookup) {
            for class in self.class_chain(&fq, lookup) {
                let inner: Vec<_> = class
                    .inner
                    .iter()
                    .filter_map(|fq| self.find_class(fq, lookup))
                    .collect();
                if !class.is_script {
                    add(class);
                }
                inner.into_iter().for_each(&mut add);
            }
        }

        for import in &self.imports {
            if let Some(class) = self.find_class(&import.class_path, lookup) {
                add(class);
            }
        }

        let package = self.package.as_deref().unwrap_or("");
        let local = self
            .classes
            .iter()
            .filter(|c| c.enclosing.is_none() && !c.is_script)
            .cloned();
        local
            .chain(lookup.package_classes(package))
            .filter(|c| !c.is_script)
            .for_each(&mut add);
        out
    }
}
