//! Editor-facing analysis of Jactl scripts.
//!
//! [`Analyzer`] composes the pieces: a [`Frontend`] (lexer, grammar,
//! resolver, globals) turns a file's text into a [`ParsedScript`], the
//! [`AstCache`] keeps the most recently used scripts, and the [`SourceSet`]
//! knows which files exist and in which package.
//!
//! Queries are keyed by [`AstKey`](jactl_ir::AstKey): the
//! `(file, kind, offset)` triple an editor tree node carries. Each query
//! takes the current text; an unchanged text is answered from the cache.
//!
//! ```text
//! text ──lex──> tokens ──grammar + recorder──> events ──materialize──> tree + keys
//!                                                                     │
//!                                            resolver <── AST ────────┘
//!                                                │
//!                                        ParsedScript (cached)
//! ```

mod analyzer;
mod cache;
mod config;
mod error;
mod frontend;
mod script;
mod sources;

pub use analyzer::Analyzer;
pub use cache::AstCache;
pub use config::{CacheConfig, COMPLETION_PLACEHOLDER};
pub use error::IdeError;
pub use frontend::{Frontend, OUTSIDE_SOURCE_ROOTS};
pub use script::{NodeRef, ParsedScript};
pub use sources::{SourceFile, SourceSet};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=jactl_ide=debug,jactl_tree=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
