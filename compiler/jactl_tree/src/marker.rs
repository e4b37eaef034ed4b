//! Marker records and events.

use std::fmt;

use jactl_diagnostic::Diagnostic;
use jactl_ir::{NodeId, NodeKind, Token};

/// Index of a marker in the recorder's arena. Ids follow creation order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u32);

impl MarkerId {
    pub(crate) fn new(index: usize) -> Self {
        let raw = u32::try_from(index)
            .unwrap_or_else(|_| panic!("more than {} markers in one parse", u32::MAX));
        MarkerId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({})", self.0)
    }
}

/// Lifecycle state of a marker.
///
/// `Open` moves exactly once to one of the other states.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MarkerState {
    Open,
    Done,
    Dropped,
    Error,
    /// Removed from the event stream by a rollback.
    RolledBack,
}

/// One structural span recorded during a parse.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub state: MarkerState,
    /// Assigned on completion. `List` for markers completed without a node.
    pub kind: Option<NodeKind>,
    /// Offset of the first significant token after the marker's start.
    pub offset: Option<u32>,
    /// Identifier marker of a function or class declaration.
    pub name_key: Option<MarkerId>,
    pub node: Option<NodeId>,
    /// Set for error markers.
    pub diagnostic: Option<Diagnostic>,
    /// Token cursor when the marker was opened; rollback rewinds to it.
    pub(crate) token_pos: usize,
}

impl Marker {
    pub(crate) fn open(token_pos: usize) -> Self {
        Marker {
            state: MarkerState::Open,
            kind: None,
            offset: None,
            name_key: None,
            node: None,
            diagnostic: None,
            token_pos,
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == MarkerState::Done
    }
}

/// Entry of the recorded event list.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Event {
    Token(Token),
    Start(MarkerId),
    End(MarkerId),
}
