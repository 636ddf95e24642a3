//! The core AST/type/pattern/value data model.
//!
//! spec.md §3 describes this as external input delivered by the (out of
//! scope) parser and type checker. This module gives that description a
//! concrete Rust shape so the rest of the crate — and its tests — have
//! something to compile and lower.

pub mod decl;
pub mod expr;
pub mod ident;
pub mod pat;
pub mod ty;
pub mod value;

pub use decl::Decl;
pub use expr::{AggCall, Direction, Expr, FromExpr, Step};
pub use ident::{Id, OverloadId};
pub use pat::Pat;
pub use ty::{Ctor, DataType, PrimType, Type};
pub use value::Value;
