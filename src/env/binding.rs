//! A single environment binding.

use crate::core::{Id, OverloadId, Type, Value};

/// What kind of name a binding introduces.
#[derive(Clone, Debug, PartialEq)]
pub enum BindingKind {
    /// An ordinary value binding.
    Val,
    /// One instance of an overloaded name.
    Inst(OverloadId),
}

/// `(id, kind, value?, overloadId?)` — spec.md §3.
///
/// `value` is `None` for a type-only binding (the identifier is in scope
/// but has no foldable payload) and `Some(Value::Unit)` for the explicit
/// unit sentinel; `ty` is carried alongside `value` so lowering can expand
/// a record-typed identifier into its field tuple (spec.md §4.6.5).
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub id: Id,
    pub kind: BindingKind,
    pub value: Option<Value>,
    pub ty: Option<Type>,
}

impl Binding {
    pub fn val(id: Id) -> Self {
        Binding { id, kind: BindingKind::Val, value: None, ty: None }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn inst(id: Id, overload: OverloadId) -> Self {
        Binding { id, kind: BindingKind::Inst(overload), value: None, ty: None }
    }

    /// Does this binding's name resolve an unqualified lookup for `name`?
    /// Per spec.md §4.1: matches the binding's own id name, or (for an
    /// overload instance) the group's overloaded name.
    pub fn matches_name(&self, name: &str) -> bool {
        if self.id.name == name {
            return true;
        }
        matches!(&self.kind, BindingKind::Inst(ov) if ov.name == name)
    }
}
