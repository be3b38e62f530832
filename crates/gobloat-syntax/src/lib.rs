//! Syntax definitions for the Go subset gobloat rewrites.
//!
//! This crate holds the pieces shared by the parser, printer and transform
//! crates: token kinds with spans, the arena-based AST, and pre-order tree
//! walking.

pub mod ast;
pub mod token;
pub mod walk;

pub use ast::{ExprId, SourceFile, StmtId};
pub use token::{Span, Token, TokenKind};
pub use walk::Node;
