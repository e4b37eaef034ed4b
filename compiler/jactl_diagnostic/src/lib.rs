//! Diagnostics for Jactl editor tooling.
//!
//! Diagnostics come from three places:
//! - syntax errors recorded by error markers while parsing
//! - resolution errors reported by the resolver after materialization
//! - configuration errors (for example an invalid globals script), which are
//!   anchored at the first node of a file rather than at a statement
//!
//! All of them end up in a [`DiagnosticIndex`], bucketed by source offset, so
//! that editor annotators can ask "what is wrong at this offset" cheaply.
//! [`MessageSet`] implements the per-parse "report each message once" rule.

mod dedup;
mod diagnostic;
mod index;

pub use dedup::MessageSet;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use index::DiagnosticIndex;
