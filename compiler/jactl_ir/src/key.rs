//! Position keys correlating tree nodes with semantic nodes.

use std::fmt;

use crate::{FileId, NodeKind};

/// `(file, kind, offset)` key of a node in a materialized parse.
///
/// `offset` is the offset of the first non-trivia token the node spans. Keys
/// are stable across re-parses of identical text, which is what lets editor
/// features hold on to them between keystrokes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AstKey {
    pub file: FileId,
    pub kind: NodeKind,
    pub offset: u32,
}

impl AstKey {
    #[inline]
    pub const fn new(file: FileId, kind: NodeKind, offset: u32) -> Self {
        AstKey { file, kind, offset }
    }
}

impl fmt::Debug for AstKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AstKey[{}:{}:{}]",
            self.file.raw(),
            self.kind,
            self.offset
        )
    }
}
