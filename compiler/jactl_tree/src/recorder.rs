//! The event recorder.
//!
//! The recorder owns the token cursor and the flat event list of one parse.
//! Tokens are pushed lazily: [`Recorder::bump`] appends any pending trivia
//! together with the next significant token, so trivia in front of a token
//! ends up inside whatever marker is opened before it is consumed.

use jactl_diagnostic::{Diagnostic, MessageSet};
use jactl_ir::{Ast, NodeId, NodeKind, Span, Token, TokenKind};
use tracing::trace;

use crate::{CancellationToken, Event, Marker, MarkerId, MarkerState, TreeError};

/// Records marker and token events for one parse.
pub struct Recorder<'t> {
    tokens: &'t [Token],
    /// Index of the next token not yet pushed as an event.
    pos: usize,
    events: Vec<Event>,
    markers: Vec<Marker>,
    /// Open markers, outermost first.
    open: Vec<MarkerId>,
    messages: MessageSet,
    cancel: CancellationToken,
}

/// Completed event list of one parse, ready for materialization.
#[derive(Clone, Debug)]
pub struct Recording {
    pub events: Vec<Event>,
    pub markers: Vec<Marker>,
}

impl Recording {
    #[inline]
    pub fn marker(&self, id: MarkerId) -> &Marker {
        &self.markers[id.index()]
    }
}

impl<'t> Recorder<'t> {
    pub fn new(tokens: &'t [Token], cancel: CancellationToken) -> Self {
        Recorder {
            tokens,
            pos: 0,
            events: Vec::with_capacity(tokens.len() * 2),
            markers: Vec::new(),
            open: Vec::new(),
            messages: MessageSet::new(),
            cancel,
        }
    }

    // Token cursor

    /// Index of the `n`th significant token at or after the cursor.
    fn significant(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, token)| !token.is_trivia())
            .nth(n)
            .map(|(index, _)| index)
    }

    /// The `n`th significant token ahead (0 = current).
    ///
    /// Past the end of the stream this is a zero-width `Eof` token.
    pub fn nth_token(&self, n: usize) -> Token {
        match self.significant(n) {
            Some(index) => self.tokens[index],
            None => {
                let end = self.tokens.last().map_or(0, |t| t.span.end);
                Token::new(TokenKind::Eof, Span::point(end))
            }
        }
    }

    #[inline]
    pub fn nth(&self, n: usize) -> TokenKind {
        self.nth_token(n).kind
    }

    #[inline]
    pub fn current(&self) -> TokenKind {
        self.nth(0)
    }

    #[inline]
    pub fn current_token(&self) -> Token {
        self.nth_token(0)
    }

    #[inline]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Consume pending trivia and the current significant token.
    pub fn bump(&mut self) {
        let Some(index) = self.significant(0) else {
            self.push_tokens(self.tokens.len());
            return;
        };
        self.push_tokens(index + 1);
    }

    /// Consume the current token if it has kind `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn push_tokens(&mut self, until: usize) {
        for token in &self.tokens[self.pos..until] {
            self.events.push(Event::Token(*token));
        }
        self.pos = until;
    }

    // Markers

    /// Open a new marker at the current position.
    ///
    /// Fails only when the parse has been cancelled.
    pub fn mark(&mut self) -> Result<MarkerId, TreeError> {
        if self.cancel.is_cancelled() {
            return Err(TreeError::Cancelled);
        }
        let id = MarkerId::new(self.markers.len());
        self.markers.push(Marker::open(self.pos));
        self.events.push(Event::Start(id));
        self.open.push(id);
        Ok(id)
    }

    /// Open a new marker whose start precedes `existing`'s start.
    ///
    /// The new marker must be completed after `existing`.
    ///
    /// # Panics
    /// Panics if `existing` is not in the event stream.
    pub fn precede(&mut self, existing: MarkerId) -> MarkerId {
        let start = self
            .start_index(existing)
            .unwrap_or_else(|| panic!("cannot precede {existing:?}: not in the event stream"));
        let id = MarkerId::new(self.markers.len());
        self.markers
            .push(Marker::open(self.markers[existing.index()].token_pos));
        self.events.insert(start, Event::Start(id));
        match self.open.iter().position(|&m| m == existing) {
            Some(at) => self.open.insert(at, id),
            None => self.open.push(id),
        }
        id
    }

    /// Discard `marker` and every event recorded after its start, and rewind
    /// the token cursor to where the marker was opened.
    ///
    /// # Panics
    /// Panics if `marker` is not open.
    pub fn rollback(&mut self, marker: MarkerId) {
        self.expect_open(marker, "roll back");
        let Some(start) = self.start_index(marker) else {
            panic!("cannot roll back {marker:?}: not in the event stream");
        };

        let mut removed = 0usize;
        for event in self.events.drain(start..) {
            if let Event::Start(id) = event {
                let m = &mut self.markers[id.index()];
                m.state = MarkerState::RolledBack;
                if let Some(diag) = m.diagnostic.take() {
                    self.messages.remove(&diag.message);
                }
                removed += 1;
            }
        }
        if let Some(at) = self.open.iter().position(|&m| m == marker) {
            self.open.truncate(at);
        }
        self.pos = self.markers[marker.index()].token_pos;
        trace!(?marker, removed, "rolled back");
    }

    /// Complete `marker` as a node of kind `kind` carrying `node`.
    ///
    /// # Panics
    /// Panics if `marker` is not the innermost open marker.
    pub fn done(&mut self, marker: MarkerId, node: NodeId, kind: NodeKind) {
        self.close(marker, MarkerState::Done);
        let name_key = self.find_name_marker(marker, kind);
        let m = &mut self.markers[marker.index()];
        m.kind = Some(kind);
        m.node = Some(node);
        m.name_key = name_key;
        if name_key.is_none() && kind == NodeKind::FunDecl {
            tracing::warn!(?marker, "function declaration without a name");
        }
    }

    /// Complete `marker` with the kind classified from `node`, or drop it if
    /// the node is a no-op.
    pub fn complete(&mut self, marker: MarkerId, node: NodeId, ast: &Ast) {
        match NodeKind::classify(&ast[node].data) {
            Some(kind) => self.done(marker, node, kind),
            None => self.drop(marker),
        }
    }

    /// Complete `marker` as a grouping node with no semantic node.
    pub fn done_list(&mut self, marker: MarkerId) {
        self.close(marker, MarkerState::Done);
        self.markers[marker.index()].kind = Some(NodeKind::List);
    }

    /// Close `marker` without producing a tree node. Its contents attach to
    /// the enclosing node.
    pub fn drop(&mut self, marker: MarkerId) {
        self.close(marker, MarkerState::Dropped);
    }

    /// Close `marker` as an error node.
    ///
    /// If a diagnostic with the same message was already recorded during this
    /// parse, the marker is dropped instead.
    pub fn error(&mut self, marker: MarkerId, diagnostic: Diagnostic) {
        if !self.messages.insert(&diagnostic.message) {
            trace!(?marker, message = %diagnostic.message, "duplicate diagnostic dropped");
            self.drop(marker);
            return;
        }
        self.close(marker, MarkerState::Error);
        self.markers[marker.index()].diagnostic = Some(diagnostic);
    }

    fn close(&mut self, marker: MarkerId, state: MarkerState) {
        self.expect_open(marker, "complete");
        match self.open.last() {
            Some(&innermost) if innermost == marker => {
                self.open.pop();
            }
            Some(&innermost) => {
                panic!("cannot complete {marker:?} while {innermost:?} is still open")
            }
            None => panic!("cannot complete {marker:?}: no open markers"),
        }
        let offset = self
            .start_index(marker)
            .and_then(|start| first_token_offset(&self.events[start + 1..]));
        let m = &mut self.markers[marker.index()];
        m.state = state;
        m.offset = offset;
        self.events.push(Event::End(marker));
    }

    fn expect_open(&self, marker: MarkerId, action: &str) {
        let state = self.markers[marker.index()].state;
        assert!(
            state == MarkerState::Open,
            "cannot {action} {marker:?}: marker is {state:?}"
        );
    }

    fn start_index(&self, marker: MarkerId) -> Option<usize> {
        self.events
            .iter()
            .rposition(|e| *e == Event::Start(marker))
    }

    /// First completed identifier marker directly inside a declaration.
    ///
    /// Only markers that become tree nodes count as nesting levels, so a name
    /// inside a dropped wrapper is still found while a nested declaration's
    /// own name is not.
    fn find_name_marker(&self, decl: MarkerId, kind: NodeKind) -> Option<MarkerId> {
        let wanted: &[NodeKind] = match kind {
            NodeKind::FunDecl => &[NodeKind::FunctionName, NodeKind::MethodName],
            NodeKind::ClassDecl => &[NodeKind::ClassName],
            _ => return None,
        };
        let start = self.start_index(decl)?;
        let mut levels: Vec<bool> = Vec::new();
        let mut depth = 0usize;
        for event in &self.events[start + 1..] {
            match *event {
                Event::Start(id) => {
                    let m = &self.markers[id.index()];
                    if depth == 0 && m.is_done() && m.kind.is_some_and(|k| wanted.contains(&k)) {
                        return Some(id);
                    }
                    let is_node = m.is_done();
                    depth += usize::from(is_node);
                    levels.push(is_node);
                }
                Event::End(id) if id == decl => break,
                Event::End(_) => {
                    if levels.pop() == Some(true) {
                        depth -= 1;
                    }
                }
                Event::Token(_) => {}
            }
        }
        None
    }

    pub fn marker(&self, id: MarkerId) -> &Marker {
        &self.markers[id.index()]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Push the remaining tokens and hand over the recording.
    ///
    /// Fails if a marker is still open.
    pub fn finish(mut self) -> Result<Recording, TreeError> {
        if let Some(&marker) = self.open.last() {
            return Err(TreeError::Unbalanced { marker });
        }
        self.push_tokens(self.tokens.len());
        Ok(Recording {
            events: self.events,
            markers: self.markers,
        })
    }
}

/// Offset of the first significant token in `events`.
pub(crate) fn first_token_offset(events: &[Event]) -> Option<u32> {
    events.iter().find_map(|event| match event {
        Event::Token(token) if !token.is_trivia() => Some(token.offset()),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
