//! One materialized and resolved parse of a file.

use std::sync::Arc;

use jactl_diagnostic::{Diagnostic, DiagnosticIndex};
use jactl_ir::{Ast, AstKey, FileId, Node, NodeData, NodeId, NodeKind};
use jactl_resolve::Resolution;
use jactl_tree::{Materialized, SyntaxKind, SyntaxTree, TreeId};
use rustc_hash::FxHashMap;
use tracing::warn;

/// The unit of caching. Immutable once built; a text change produces a new
/// one.
#[derive(Debug)]
pub struct ParsedScript {
    file: FileId,
    text: String,
    ast: Ast,
    root: Option<NodeId>,
    index: Materialized,
    tree_keys: FxHashMap<TreeId, AstKey>,
    errors: DiagnosticIndex,
    globals_error: Option<Diagnostic>,
    resolution: Resolution,
    degraded: bool,
}

impl ParsedScript {
    pub(crate) fn new(
        file: FileId,
        text: &str,
        ast: Ast,
        root: NodeId,
        index: Materialized,
        resolution: Resolution,
    ) -> Self {
        let tree_keys = index.tree_nodes.iter().map(|(&k, &t)| (t, k)).collect();
        let mut errors: DiagnosticIndex = index.syntax_errors.iter().cloned().collect();
        errors.extend(resolution.diagnostics.iter().cloned());
        ParsedScript {
            file,
            text: text.to_owned(),
            ast,
            root: Some(root),
            index,
            tree_keys,
            errors,
            globals_error: None,
            resolution,
            degraded: false,
        }
    }

    /// Record a diagnostic outside the syntax and resolver ones.
    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    /// Record the globals failure, anchored at the first indexed offset.
    pub(crate) fn set_globals_error(&mut self, diagnostic: Diagnostic) {
        let offset = self.index.first_offset.unwrap_or(0);
        self.globals_error = Some(diagnostic.anchored_at(offset));
    }

    /// A script holding only the text, for parses that hit an internal
    /// consistency failure.
    pub(crate) fn degraded(file: FileId, text: &str) -> Self {
        ParsedScript {
            file,
            text: text.to_owned(),
            ast: Ast::new(),
            root: None,
            index: Materialized::default(),
            tree_keys: FxHashMap::default(),
            errors: DiagnosticIndex::new(),
            globals_error: None,
            resolution: Resolution::default(),
            degraded: true,
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The script class. `None` only for degraded scripts.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.index.tree
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Smallest offset of any indexed node.
    pub fn first_offset(&self) -> Option<u32> {
        self.index.first_offset
    }

    /// Every diagnostic except the globals error, bucketed by offset.
    pub fn diagnostics(&self) -> &DiagnosticIndex {
        &self.errors
    }

    pub fn globals_error(&self) -> Option<&Diagnostic> {
        self.globals_error.as_ref()
    }

    pub fn lookup(&self, key: &AstKey) -> Option<NodeId> {
        let node = self.index.nodes.get(key).copied();
        if node.is_none() {
            warn!(?key, "no AST node for key");
        }
        node
    }

    pub fn node(&self, key: &AstKey) -> Option<&Node> {
        self.ast.get(self.lookup(key)?)
    }

    pub fn tree_node(&self, key: &AstKey) -> Option<TreeId> {
        self.index.tree_nodes.get(key).copied()
    }

    /// Key of the tree node `id`, if it is indexed.
    pub fn key_of_tree(&self, id: TreeId) -> Option<AstKey> {
        self.tree_keys.get(&id).copied()
    }

    /// Key a semantic node is reachable under.
    pub fn key_of(&self, node: NodeId) -> Option<AstKey> {
        self.index.node_keys.get(&node).copied()
    }

    /// Identifier key of a function or class declaration.
    pub fn name_key(&self, decl: &AstKey) -> Option<AstKey> {
        self.index.name_keys.get(decl).copied()
    }

    /// Diagnostics at `offset`, the globals error first when the offset is
    /// the first indexed one.
    pub fn errors_at(&self, offset: u32) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if let Some(globals) = &self.globals_error {
            if globals.offset() == offset {
                out.push(globals.clone());
            }
        }
        out.extend_from_slice(self.errors.at(offset));
        out
    }

    /// Diagnostics to show on tree node `id`. A node whose first significant
    /// child starts at the same offset shows nothing: the innermost node
    /// reports. Trivia shows nothing.
    pub fn errors_for_node(&self, id: TreeId) -> Vec<Diagnostic> {
        let tree = self.tree();
        if matches!(tree.kind(id), SyntaxKind::Token(kind) if kind.is_trivia()) {
            return Vec::new();
        }
        let offset = significant_start(tree, id);
        let shadowed = tree
            .first_significant_child(id)
            .is_some_and(|child| significant_start(tree, child) == offset);
        if shadowed {
            return Vec::new();
        }
        self.errors_at(offset)
    }

    /// The node at `key` or, failing that, its nearest indexed ancestor the
    /// resolver placed in a scope.
    pub fn scoped_node(&self, key: &AstKey) -> Option<NodeId> {
        if let Some(node) = self.index.nodes.get(key) {
            if self.resolution.node_block.contains_key(node) {
                return Some(*node);
            }
        }
        let tree = self.tree();
        tree.ancestors(self.tree_node(key)?)
            .filter_map(|id| self.key_of_tree(id))
            .filter_map(|k| self.index.nodes.get(&k).copied())
            .find(|node| self.resolution.node_block.contains_key(node))
    }

    /// Offset used to decide which variables precede `key`. Inside a
    /// variable declaration this is the declaration itself, so the variable
    /// being declared is not visible in its own initialiser.
    pub fn location_of(&self, key: &AstKey) -> u32 {
        let enclosing_decl = (key.kind == NodeKind::Identifier)
            .then(|| self.tree_node(key))
            .flatten()
            .and_then(|id| {
                let tree = self.tree();
                tree.ancestors(id)
                    .find(|&a| tree.kind(a) == SyntaxKind::Node(NodeKind::VarDecl))
            })
            .and_then(|id| self.key_of_tree(id))
            .and_then(|k| self.index.nodes.get(&k).copied());
        match enclosing_decl.or_else(|| self.index.nodes.get(key).copied()) {
            Some(node) => self.ast[node].span.start,
            None => key.offset,
        }
    }

    /// The `ClassDecl` node of a class declared in this file.
    pub fn class_node(&self, fq_name: &str) -> Option<NodeId> {
        let desc = self.resolution.local_class(fq_name)?;
        matches!(self.ast.get(desc.decl)?.data, NodeData::ClassDecl(_)).then_some(desc.decl)
    }
}

/// Offset of the first non-trivia token under `id`. Leading trivia is
/// recorded inside the following node, so spans may start earlier.
fn significant_start(tree: &SyntaxTree, id: TreeId) -> u32 {
    let mut node = id;
    while let Some(child) = tree.first_significant_child(node) {
        node = child;
    }
    tree.get(node).span.start
}

/// A semantic node together with the script that owns it.
#[derive(Clone, Debug)]
pub struct NodeRef {
    script: Arc<ParsedScript>,
    id: NodeId,
}

impl NodeRef {
    pub(crate) fn new(script: Arc<ParsedScript>, id: NodeId) -> Self {
        NodeRef { script, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn script(&self) -> &Arc<ParsedScript> {
        &self.script
    }

    pub fn node(&self) -> &Node {
        &self.script.ast()[self.id]
    }

    pub fn data(&self) -> &NodeData {
        &self.node().data
    }
}
