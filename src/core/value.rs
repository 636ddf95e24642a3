//! Runtime-ish constant values that flow through the core AST and the
//! relational lowering (literals, folded identifiers, foreign handles).

use indexmap::IndexMap;

/// A literal or folded constant value.
///
/// `Unit` doubles as the "no value" sentinel used by [`crate::env::Binding`]
/// to mark a binding that exists but carries no foldable payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Char(char),
    Int(i64),
    Real(u64), // bit pattern of an f64; avoids `Eq`-breaking NaN comparisons
    String(String),
    /// A foreign relation scope: field name -> opaque handle identifying the
    /// underlying relation in the external data source.
    Foreign(IndexMap<String, String>),
    /// A finite literal list/collection, fully folded to constant
    /// elements (e.g. surface `[1,2,3]`, desugared by the time it
    /// reaches the core AST). Lowerable directly via
    /// [`crate::lower::builder::RelBuilder::values`].
    List(Vec<Value>),
}

impl Value {
    pub fn real(v: f64) -> Self {
        Value::Real(v.to_bits())
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}
