//! Concrete syntax tree.
//!
//! An arena of [`TreeNode`]s. Leaves are source tokens (with whitespace runs
//! merged), internal nodes correspond to completed markers. The root has
//! kind [`SyntaxKind::Root`] and collects anything outside every marker.

use std::fmt::{self, Write as _};

use jactl_ir::{NodeKind, Span, TokenKind};
use smallvec::SmallVec;

/// Index of a node in a [`SyntaxTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TreeId(u32);

impl TreeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeId({})", self.0)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SyntaxKind {
    Root,
    Node(NodeKind),
    Token(TokenKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub parent: Option<TreeId>,
    pub children: SmallVec<[TreeId; 4]>,
}

impl TreeNode {
    #[inline]
    pub fn is_token(&self) -> bool {
        matches!(self.kind, SyntaxKind::Token(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<TreeNode>,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTree {
    /// A tree holding only an empty root.
    pub fn new() -> Self {
        SyntaxTree {
            nodes: vec![TreeNode {
                kind: SyntaxKind::Root,
                span: Span::point(0),
                parent: None,
                children: SmallVec::new(),
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> TreeId {
        TreeId(0)
    }

    pub(crate) fn push(&mut self, parent: TreeId, kind: SyntaxKind, span: Span) -> TreeId {
        let raw = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("syntax tree exceeds {} nodes", u32::MAX));
        let id = TreeId(raw);
        self.nodes.push(TreeNode {
            kind,
            span,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: TreeId) -> &mut TreeNode {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: TreeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn kind(&self, id: TreeId) -> SyntaxKind {
        self.get(id).kind
    }

    pub fn parent(&self, id: TreeId) -> Option<TreeId> {
        self.get(id).parent
    }

    pub fn children(&self, id: TreeId) -> &[TreeId] {
        &self.get(id).children
    }

    /// First child that is not whitespace or a comment.
    pub fn first_significant_child(&self, id: TreeId) -> Option<TreeId> {
        self.children(id).iter().copied().find(|&child| {
            !matches!(self.kind(child), SyntaxKind::Token(kind) if kind.is_trivia())
        })
    }

    /// `id` and its ancestors, innermost first.
    pub fn ancestors(&self, id: TreeId) -> impl Iterator<Item = TreeId> + '_ {
        std::iter::successors(Some(id), |&node| self.parent(node))
    }

    /// Token leaves in document order.
    pub fn leaves(&self) -> Vec<TreeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.is_token() {
                out.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Concatenated leaf texts.
    pub fn text(&self, source: &str) -> String {
        self.leaves()
            .into_iter()
            .map(|leaf| self.get(leaf).span.slice(source))
            .collect()
    }

    /// Innermost internal node of `kind` whose span contains `offset`.
    pub fn node_at(&self, offset: u32, kind: NodeKind) -> Option<TreeId> {
        let mut found = None;
        let mut current = self.root();
        loop {
            if self.kind(current) == SyntaxKind::Node(kind) {
                found = Some(current);
            }
            let next = self.children(current).iter().copied().find(|&child| {
                let node = self.get(child);
                !node.is_token() && node.span.contains(offset)
            });
            match next {
                Some(child) => current = child,
                None => return found,
            }
        }
    }

    /// Indented outline of the tree, one node per line.
    pub fn dump(&self, source: &str) -> String {
        let mut out = String::new();
        self.dump_node(self.root(), 0, source, &mut out);
        out
    }

    fn dump_node(&self, id: TreeId, depth: usize, source: &str, out: &mut String) {
        let node = self.get(id);
        let _ = write!(out, "{:indent$}", "", indent = depth * 2);
        let _ = match node.kind {
            SyntaxKind::Root => writeln!(out, "ROOT"),
            SyntaxKind::Node(kind) => writeln!(out, "{kind}@{:?}", node.span),
            SyntaxKind::Token(kind) => {
                writeln!(out, "{kind:?} {:?}", node.span.slice(source))
            }
        };
        for &child in &node.children {
            self.dump_node(child, depth + 1, source, out);
        }
    }
}
