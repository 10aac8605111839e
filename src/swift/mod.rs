//! Swift declaration tree and source emission.
//!
//! This is the target-language layer of the generator:
//! - `decl`: type references, declarations, expressions, statements
//! - `emit`: declaration tree to Swift source strings (via the `Emit` trait)
//! - `ident`: identifier sanitizing and casing
//!
//! Declarations are immutable once constructed; emission is purely mechanical
//! string building with no target-language decisions left in it.

pub mod decl;
pub mod emit;
pub mod ident;

pub use decl::{
    BlockKind, Decl, Expr, FunctionDecl, FunctionParam, InterpPart, PropertyDecl, Stmt,
    SwiftTypeRef, TypeBlock,
};
pub use emit::Emit;
