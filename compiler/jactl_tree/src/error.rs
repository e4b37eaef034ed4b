//! Errors raised while recording a parse or materializing its tree.

use thiserror::Error;

use crate::MarkerId;

/// Failure of a parse or materialization.
///
/// `Cancelled` is the only expected variant. The others are defects in the
/// grammar driving the recorder, never user-facing diagnostics.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    #[error("parse cancelled")]
    Cancelled,

    #[error("marker {marker:?} was completed but no token follows its start")]
    MarkerWithoutToken { marker: MarkerId },

    #[error("marker {marker:?} was never completed")]
    Unbalanced { marker: MarkerId },
}
