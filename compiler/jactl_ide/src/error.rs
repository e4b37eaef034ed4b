//! Errors surfaced by the analyzer.

use thiserror::Error;

/// Failure of a cache operation.
///
/// Parse and resolution problems are never errors: they are diagnostics on
/// the returned script. Only an aborted parse is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IdeError {
    #[error("parse cancelled")]
    Cancelled,
}
