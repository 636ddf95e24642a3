//! C7 §4.6.5: translating a core expression to a scalar Rex in the
//! current row of a `from`'s relational lowering.

use indexmap::IndexMap;

use crate::core::{Expr, Id, Type, Value};
use crate::env::Environment;

use super::builder::{ColRange, RelBuilder, RexNode};

/// How a source-level variable resolves against the current row.
///
/// Per spec.md §9 ("Callbacks as first-class values"), the Java
/// original's `variableMap` stores per-row resolver closures; this crate
/// follows the design notes' explicit alternative for a language without
/// first-class closures-as-map-values: a tagged variant plus a resolver
/// function, rather than a `Box<dyn Fn>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarRef {
    /// A single scalar column.
    Scalar(usize),
    /// The range of columns one record-typed source contributed, plus
    /// their field names in their declared (not name-sorted) order, so a
    /// `#field` selector can find its column by name.
    Range { range: ColRange, fields: Vec<String> },
}

impl VarRef {
    /// Resolve a bare reference to this variable (spec.md §4.6.5's
    /// "look up in the variableMap and call the stored resolver").
    pub fn resolve(&self, builder: &dyn RelBuilder, name: &str) -> RexNode {
        match self {
            VarRef::Scalar(index) => builder.field(*index),
            VarRef::Range { range, .. } => builder.field_range(*range, name),
        }
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        match self {
            VarRef::Scalar(_) => None,
            VarRef::Range { range, fields } => {
                fields.iter().position(|f| f == field).map(|i| range.offset + i)
            }
        }
    }
}

pub type VariableMap = IndexMap<String, VarRef>;

/// Translate `expr` to a scalar Rex node in the row `variable_map`
/// resolves against, or `None` if this expression shape cannot be
/// lowered — spec.md §4.6.5's "anything else: lowering fails", which
/// lets the enclosing `from` fall back to interpreter code rather than
/// abort compilation (spec.md §9, "exceptions as control flow").
pub fn translate(
    env: &Environment,
    builder: &dyn RelBuilder,
    variable_map: &VariableMap,
    expr: &Expr,
) -> Option<RexNode> {
    match expr {
        Expr::Lit(value) => Some(translate_literal(builder, value)),
        Expr::Id(id) => translate_id(env, builder, variable_map, id),
        Expr::RecordSelector { field, arg } => translate_selector(builder, variable_map, field, arg),
        Expr::Tuple(items) => {
            let args: Option<Vec<RexNode>> =
                items.iter().map(|e| translate(env, builder, variable_map, e)).collect();
            Some(RexNode::Row(args?))
        }
        Expr::Apply { .. } => translate_call(env, builder, variable_map, expr),
        _ => None,
    }
}

/// A curried call `((f a) b) …` whose head resolves to a plain
/// identifier translates to `builder.call(name, args)` — the relational
/// counterpart of an ordinary built-in operator application (`>`, `+`,
/// …), without which a `where`/`order`/`group` key built from a
/// comparison or arithmetic expression could never reach the builder.
fn translate_call(
    env: &Environment,
    builder: &dyn RelBuilder,
    variable_map: &VariableMap,
    expr: &Expr,
) -> Option<RexNode> {
    let (id, args) = uncurry(expr)?;
    let translated: Option<Vec<RexNode>> =
        args.iter().map(|a| translate(env, builder, variable_map, a)).collect();
    Some(builder.call(&id.name, translated?))
}

fn uncurry(expr: &Expr) -> Option<(&Id, Vec<&Expr>)> {
    let mut args = Vec::new();
    let mut cur = expr;
    loop {
        match cur {
            Expr::Apply { func, arg } => {
                args.push(arg.as_ref());
                cur = func;
            }
            Expr::Id(id) => {
                args.reverse();
                return Some((id, args));
            }
            _ => return None,
        }
    }
}

fn translate_literal(builder: &dyn RelBuilder, value: &Value) -> RexNode {
    match value {
        // Char literals become single-character strings (spec.md §9 OQ2):
        // a workaround for builders without a native CHAR type.
        Value::Char(c) => builder.literal(Value::String(c.to_string())),
        // Unit literals become empty rows.
        Value::Unit => RexNode::Row(vec![]),
        other => builder.literal(other.clone()),
    }
}

fn translate_id(
    env: &Environment,
    builder: &dyn RelBuilder,
    variable_map: &VariableMap,
    id: &Id,
) -> Option<RexNode> {
    if let Some(binding) = env.get_opt(&id.name) {
        if let Some(value) = &binding.value {
            if !value.is_unit() {
                return Some(translate_literal(builder, value));
            }
        }
        if let Some(Type::Record(fields)) = &binding.ty {
            let parts: Option<Vec<RexNode>> = fields
                .iter()
                .map(|(fname, _)| {
                    translate_selector(builder, variable_map, fname, &Expr::Id(id.clone()))
                })
                .collect();
            return Some(RexNode::Row(parts?));
        }
    }
    variable_map.get(&id.name).map(|v| v.resolve(builder, &id.name))
}

fn translate_selector(
    builder: &dyn RelBuilder,
    variable_map: &VariableMap,
    field: &str,
    arg: &Expr,
) -> Option<RexNode> {
    let Expr::Id(id) = arg else { return None };
    let var = variable_map.get(&id.name)?;
    var.field_index(field).map(|idx| builder.field(idx))
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
