//! Parse event recording and syntax tree materialization.
//!
//! A recursive-descent grammar drives a [`Recorder`] while it walks the token
//! stream: it opens markers with [`Recorder::mark`], completes them with the
//! semantic node they produced, drops them, tags them as errors, wraps them
//! after the fact with [`Recorder::precede`] or backtracks with
//! [`Recorder::rollback`]. The recorder only appends to a flat event list.
//!
//! Once the grammar returns, [`materialize`] replays the events in a single
//! pass and produces a [`SyntaxTree`] whose leaves are the source tokens, plus
//! the [`AstKey`](jactl_ir::AstKey) indexes that correlate tree positions with
//! semantic nodes.
//!
//! # Concurrency
//!
//! A recorder belongs to exactly one parse and is used through `&mut`, so the
//! event list is never shared. The only cross-thread state is the
//! [`CancellationToken`], checked at the start of every `mark()`.

mod cancel;
mod error;
mod marker;
mod materialize;
mod recorder;
mod syntax;

pub use cancel::CancellationToken;
pub use error::TreeError;
pub use marker::{Event, Marker, MarkerId, MarkerState};
pub use materialize::{materialize, Materialized};
pub use recorder::{Recorder, Recording};
pub use syntax::{SyntaxKind, SyntaxTree, TreeId, TreeNode};

use jactl_ir::{Ast, NodeId};

/// A grammar that drives a [`Recorder`] over one script.
///
/// Implementations consume every significant token up to and including
/// [`Eof`](jactl_ir::TokenKind::Eof), allocate semantic nodes in `ast` and
/// return the root node (the script class).
pub trait Grammar: Send + Sync {
    /// Parse the recorder's token stream.
    ///
    /// Returns [`TreeError::Cancelled`] if the recorder's cancellation token
    /// fires; other failures are reported as error markers, not as `Err`.
    fn parse(
        &self,
        source: &str,
        recorder: &mut Recorder<'_>,
        ast: &mut Ast,
    ) -> Result<NodeId, TreeError>;
}
