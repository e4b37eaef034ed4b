//! Replays a [`Recording`] into a [`SyntaxTree`] and its key indexes.

use jactl_diagnostic::Diagnostic;
use jactl_ir::{Ast, AstKey, FileId, NodeData, NodeId, NodeKind, Span, Token, TokenKind};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::recorder::first_token_offset;
use crate::{Event, Marker, MarkerId, MarkerState, Recording, SyntaxKind, SyntaxTree, TreeError, TreeId};

/// Output of [`materialize`].
#[derive(Clone, Debug, Default)]
pub struct Materialized {
    pub tree: SyntaxTree,
    /// Semantic node of each indexed key.
    pub nodes: FxHashMap<AstKey, NodeId>,
    /// Tree node of each indexed key.
    pub tree_nodes: FxHashMap<AstKey, TreeId>,
    /// Key each semantic node is reachable under. Declaration expressions
    /// point at their statement or name key rather than a key of their own.
    pub node_keys: FxHashMap<NodeId, AstKey>,
    /// Declaration key to identifier key, for functions and named classes.
    pub name_keys: FxHashMap<AstKey, AstKey>,
    /// Smallest indexed offset.
    pub first_offset: Option<u32>,
    /// Diagnostics of error markers, anchored at the marker offsets.
    pub syntax_errors: Vec<Diagnostic>,
}

/// Frame of the replay stack: the tree node a `Start` opened, if any.
struct Frame {
    marker: MarkerId,
    node: Option<TreeId>,
    offset: u32,
}

/// Replay `recording` into a tree.
///
/// Done markers become internal nodes. Dropped markers, error markers and
/// closures the grammar turned into plain blocks produce no node; their
/// contents attach to the enclosing node.
pub fn materialize(
    file: FileId,
    recording: &Recording,
    ast: &Ast,
) -> Result<Materialized, TreeError> {
    let events = &recording.events;
    let mut out = Materialized::default();
    let mut frames: Vec<Frame> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match *event {
            Event::Token(token) => {
                let parent = current_parent(&frames, &out.tree);
                push_leaf(&mut out.tree, parent, token);
            }
            Event::Start(id) => {
                let marker = recording.marker(id);
                let offset = marker
                    .offset
                    .or_else(|| first_token_offset(&events[index + 1..]));
                let node = match marker.state {
                    MarkerState::Done if !is_block_closure(marker, ast) => {
                        let offset = offset.ok_or(TreeError::MarkerWithoutToken { marker: id })?;
                        let kind = marker.kind.unwrap_or(NodeKind::List);
                        let parent = current_parent(&frames, &out.tree);
                        Some(out.tree.push(
                            parent,
                            SyntaxKind::Node(kind),
                            Span::point(offset),
                        ))
                    }
                    MarkerState::Error => {
                        if let Some(diag) = &marker.diagnostic {
                            let at = offset.unwrap_or(diag.offset());
                            out.syntax_errors.push(diag.clone().anchored_at(at));
                        }
                        None
                    }
                    _ => None,
                };
                frames.push(Frame {
                    marker: id,
                    node,
                    offset: offset.unwrap_or(0),
                });
            }
            Event::End(id) => {
                let frame = match frames.pop() {
                    Some(frame) if frame.marker == id => frame,
                    _ => return Err(TreeError::Unbalanced { marker: id }),
                };
                if let Some(tree_id) = frame.node {
                    close_node(&mut out.tree, tree_id);
                    index_node(&mut out, file, recording, ast, id, tree_id, frame.offset);
                }
            }
        }
    }

    if let Some(frame) = frames.pop() {
        return Err(TreeError::Unbalanced {
            marker: frame.marker,
        });
    }
    let root = out.tree.root();
    close_node(&mut out.tree, root);

    debug!(
        tree_nodes = out.tree.len(),
        keys = out.nodes.len(),
        syntax_errors = out.syntax_errors.len(),
        "materialized"
    );
    Ok(out)
}

fn current_parent(frames: &[Frame], tree: &SyntaxTree) -> TreeId {
    frames
        .iter()
        .rev()
        .find_map(|frame| frame.node)
        .unwrap_or_else(|| tree.root())
}

fn is_block_closure(marker: &Marker, ast: &Ast) -> bool {
    marker
        .node
        .and_then(|node| ast.get(node))
        .is_some_and(|node| matches!(node.data, NodeData::Closure { is_block: true, .. }))
}

/// Append `token` under `parent`, merging adjacent whitespace and newlines
/// into a single leaf.
fn push_leaf(tree: &mut SyntaxTree, parent: TreeId, token: Token) {
    if token.kind.is_whitespace() {
        if let Some(&last) = tree.children(parent).last() {
            let prev = tree.get(last);
            let mergeable = matches!(prev.kind, SyntaxKind::Token(kind) if kind.is_whitespace())
                && prev.span.end == token.span.start;
            if mergeable {
                let leaf = tree.node_mut(last);
                leaf.span = leaf.span.merge(token.span);
                leaf.kind = SyntaxKind::Token(TokenKind::Whitespace);
                return;
            }
        }
    }
    tree.push(parent, SyntaxKind::Token(token.kind), token.span);
}

/// Set a node's span from its children. Childless nodes keep their point span.
fn close_node(tree: &mut SyntaxTree, id: TreeId) {
    let children = tree.children(id);
    let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
        return;
    };
    let span = Span::new(tree.get(first).span.start, tree.get(last).span.end);
    tree.node_mut(id).span = span;
}

fn index_node(
    out: &mut Materialized,
    file: FileId,
    recording: &Recording,
    ast: &Ast,
    id: MarkerId,
    tree_id: TreeId,
    offset: u32,
) {
    let marker = recording.marker(id);
    let Some(kind) = marker.kind else { return };
    let Some(node) = marker.node else {
        if kind != NodeKind::List {
            warn!(?id, %kind, "completed marker without a semantic node");
        }
        return;
    };
    let data = &ast[node].data;
    if matches!(data, NodeData::Noop) {
        return;
    }

    let key = AstKey::new(file, kind, offset);
    // Ends arrive innermost first, so an enclosing node sharing the key wins.
    // Left-nested chains (`a + b + c`, `f(x)(y)`) share their first token.
    if let Some(previous) = out.nodes.insert(key, node) {
        warn!(?key, ?previous, ?node, "key shadowed by enclosing node");
        if out.node_keys.get(&previous) == Some(&key) {
            out.node_keys.remove(&previous);
        }
    }
    out.tree_nodes.insert(key, tree_id);
    out.node_keys.insert(node, key);
    out.first_offset = Some(out.first_offset.map_or(offset, |first| first.min(offset)));

    let name_key = marker.name_key.and_then(|name| {
        let name_marker = recording.marker(name);
        Some(AstKey::new(file, name_marker.kind?, name_marker.offset?))
    });
    match name_key {
        Some(name_key) => out.name_keys.insert(key, name_key),
        None => out.name_keys.remove(&key),
    };

    match *data {
        NodeData::VarDecl { decl } => {
            out.node_keys.insert(decl, key);
        }
        NodeData::FunDecl { decl } => match name_key {
            Some(name_key) => {
                out.node_keys.insert(decl, name_key);
            }
            None => warn!(?key, "function declaration has no name key"),
        },
        NodeData::ClassDecl(ref class) if !class.is_script => match name_key {
            Some(name_key) => {
                out.node_keys.insert(node, name_key);
            }
            None => warn!(?key, "class declaration has no name key"),
        },
        _ => {}
    }
}
