//! Core expressions, including the `from` comprehension node (spec.md §3).

use super::decl::Decl;
use super::ident::Id;
use super::pat::Pat;
use super::ty::Type;
use super::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Lit(Value),
    Id(Id),
    Tuple(Vec<Expr>),
    /// A literal record expression, e.g. the `{e = E}` wrap the
    /// relationalizer builds when flattening a nested `from`.
    Record(Vec<(String, Expr)>),
    /// `#field arg` — a record/range selector applied to an expression.
    RecordSelector { field: String, arg: Box<Expr> },
    Fn { pat: Pat, body: Box<Expr> },
    Apply { func: Box<Expr>, arg: Box<Expr> },
    Let { decl: Box<Decl>, body: Box<Expr> },
    Local { decl: Box<Decl>, body: Box<Expr> },
    Match { scrutinee: Box<Expr>, scrutinee_ty: Type, arms: Vec<(Pat, Expr)> },
    From(FromExpr),
    /// The unresolved extent of a pattern's type — "every value of this
    /// type" — standing in for a `from` source until `SuchThat`
    /// elaboration (spec.md §4.5 step 3) pins it down to a finite bound.
    Unbounded(Type),
}

impl Expr {
    /// Curry two arguments onto a function identified by name, i.e. build
    /// `(name a) b`. Used to recognize/construct calls like `map f xs`.
    pub fn call2(name: &str, a: Expr, b: Expr) -> Expr {
        Expr::Apply {
            func: Box::new(Expr::Apply { func: Box::new(Expr::Id(Id::plain(name))), arg: Box::new(a) }),
            arg: Box::new(b),
        }
    }

    /// Recognize a one-argument call to a builtin named `name`, returning
    /// its argument. Used to recognize `union (a, b, c)` and friends.
    pub fn as_call1<'a>(&'a self, name: &str) -> Option<&'a Expr> {
        if let Expr::Apply { func, arg } = self {
            if let Expr::Id(id) = func.as_ref() {
                if id.name == name {
                    return Some(arg.as_ref());
                }
            }
        }
        None
    }

    /// Recognize a fully-curried two-argument call to a builtin named
    /// `name`, returning its two arguments.
    pub fn as_call2<'a>(&'a self, name: &str) -> Option<(&'a Expr, &'a Expr)> {
        if let Expr::Apply { func, arg: b } = self {
            if let Expr::Apply { func: inner_func, arg: a } = func.as_ref() {
                if let Expr::Id(id) = inner_func.as_ref() {
                    if id.name == name {
                        return Some((a.as_ref(), b.as_ref()));
                    }
                }
            }
        }
        None
    }
}

/// Sort direction for an `order` step item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One aggregate call inside a `group` step: `name = op(arg?)`.
#[derive(Clone, Debug, PartialEq)]
pub struct AggCall {
    pub name: String,
    pub op: Id,
    pub arg: Option<Expr>,
}

/// One of the five step kinds of a `from` expression (spec.md §3).
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// A source: `pat in exp`. Only valid as one of the leading steps of a
    /// `from` (spec.md §4.6.2 treats the leading run of scans as "sources").
    Scan { pat: Pat, exp: Expr },
    Where(Expr),
    Order(Vec<(Expr, Direction)>),
    Group { keys: Vec<(String, Expr)>, aggs: Vec<AggCall> },
    Yield(Expr),
}

/// A `from` comprehension: an ordered sequence of steps. The "implicit
/// yield" (no trailing `Yield` step) is the record of currently live
/// scan/group bindings, computed by [`crate::rewrite::relationalizer::implicit_yield`]
/// and by [`crate::lower::query`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FromExpr {
    pub steps: Vec<Step>,
}

impl FromExpr {
    pub fn new(steps: Vec<Step>) -> Self {
        FromExpr { steps }
    }

    /// The leading run of `Scan` steps — the `from`'s sources.
    pub fn sources(&self) -> &[Step] {
        let n = self.steps.iter().take_while(|s| matches!(s, Step::Scan { .. })).count();
        &self.steps[..n]
    }

    /// Steps after the leading scan run.
    pub fn body_steps(&self) -> &[Step] {
        let n = self.sources().len();
        &self.steps[n..]
    }

    pub fn explicit_yield(&self) -> Option<&Expr> {
        match self.steps.last() {
            Some(Step::Yield(e)) => Some(e),
            _ => None,
        }
    }
}
