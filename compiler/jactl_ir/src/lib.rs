//! Core data types shared by the Jactl editor tooling crates.
//!
//! - [`Span`]: half-open byte range into a source text
//! - [`Token`] / [`TokenKind`]: lexical units, trivia included
//! - [`FileId`]: opaque file identity used for cache keys
//! - [`NodeKind`]: closed set of tree node kinds
//! - [`AstKey`]: `(file, kind, offset)` correlation key
//! - [`Ast`]: arena of semantic nodes produced while parsing

pub mod ast;
mod file;
mod key;
mod kind;
mod span;
mod token;

pub use ast::{
    Ast, BinaryOp, ClassDecl, FunDeclExpr, Literal, NameKind, Node, NodeData, NodeId, TypeRef,
    UnaryOp, VarDeclExpr, VarRole,
};
pub use file::FileId;
pub use key::AstKey;
pub use kind::NodeKind;
pub use span::Span;
pub use token::{Token, TokenKind};
