//! Core declarations.

use super::expr::Expr;
use super::ident::Id;
use super::pat::Pat;
use super::ty::DataType;

#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Val { pat: Pat, exp: Expr },
    Fun { name: Id, pat: Pat, body: Expr },
    Datatype(DataType),
    /// `let`/`local`'s block of mutually-visible declarations.
    Sequence(Vec<Decl>),
}
