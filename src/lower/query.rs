//! C7: lowering a `from` expression (and the other recognized shapes of
//! spec.md §4.6.1) to a relational plan via the builder (C8) contract.
//!
//! Grounded on `databend`'s `bind_context.rs` (a binder context carrying
//! scope + an output column map threaded through each binding step) and
//! `risingwave`'s builder-driven plan assembly: `lower_from` threads the
//! same `(env, builder, variableMap)` triple through its steps that
//! those binders thread through a query's clauses.

use crate::core::{AggCall, Direction, Expr, FromExpr, Id, PrimType, Step, Type, Value};
use crate::env::{Binding, Environment};
use crate::rewrite::relationalizer::implicit_yield;

use super::aggregate::resolve_agg_op;
use super::builder::{AggCallSpec, ColRange, ColumnType, JoinType, RelBuilder, RelNode, RexNode, RowType};
use super::harmonize::harmonize;
use super::translate::{translate, VarRef, VariableMap};

/// Attempt to lower `expr` to a relational plan against `builder`,
/// leaving exactly one new relation on top of the builder's stack on
/// success. This is the `toRel` capability of spec.md §4.6 — "can this
/// expression be translated to a relational plan?" — expressed as a
/// plain boolean return rather than a nullable-method/exception per the
/// design notes' guidance.
pub fn try_lower(env: &Environment, builder: &mut dyn RelBuilder, expr: &Expr) -> bool {
    if try_lower_foreign(env, builder, expr) {
        return true;
    }
    if let Expr::Lit(Value::List(items)) = expr {
        return lower_list_literal(builder, items);
    }
    for op_name in ["union", "except", "intersect"] {
        if let Some(Expr::Tuple(subs)) = expr.as_call1(op_name) {
            return lower_set_op(env, builder, op_name, subs.as_slice());
        }
    }
    if let Expr::From(from) = expr {
        return lower_from(env, builder, from);
    }
    false
}

fn lower_to_node(env: &Environment, builder: &mut dyn RelBuilder, expr: &Expr) -> Option<RelNode> {
    if try_lower(env, builder, expr) {
        Some(builder.build())
    } else {
        None
    }
}

/// §4.6.1 "Foreign relation reference". Recognizes both `#field scope`
/// (the literal shape the spec names) and a bare `id` bound directly to
/// a single-entry foreign handle (the sugar a surface `from x in depts`
/// desugars to when `depts` denotes one relation, not a scope record of
/// several — spec.md's end-to-end scenario A).
fn try_lower_foreign(env: &Environment, builder: &mut dyn RelBuilder, expr: &Expr) -> bool {
    match expr {
        Expr::RecordSelector { field, arg } => {
            let Expr::Id(scope_id) = arg.as_ref() else { return false };
            let Some(binding) = env.get_opt(&scope_id.name) else { return false };
            let Some(Value::Foreign(map)) = &binding.value else { return false };
            let Some(handle) = map.get(field) else { return false };
            let field_ty = match &binding.ty {
                Some(Type::Record(fields)) => fields.iter().find(|(n, _)| n == field).map(|(_, t)| t.clone()),
                _ => None,
            };
            builder.push(RelNode::Scan { name: handle.clone(), row_type: collection_row_type(field_ty.as_ref()) });
            true
        }
        Expr::Id(id) => {
            let Some(binding) = env.get_opt(&id.name) else { return false };
            let Some(Value::Foreign(map)) = &binding.value else { return false };
            if map.len() != 1 {
                return false;
            }
            let handle = map.values().next().expect("len checked above").clone();
            builder.push(RelNode::Scan { name: handle, row_type: collection_row_type(binding.ty.as_ref()) });
            true
        }
        _ => false,
    }
}

/// Row type of a collection type's element (unwrapping `List`/`Bag`),
/// flattening a record element into its named columns.
fn collection_row_type(ty: Option<&Type>) -> RowType {
    let elem = match ty {
        Some(Type::List(inner)) | Some(Type::Bag(inner)) => inner.as_ref(),
        Some(other) => other,
        None => return RowType::empty(),
    };
    scalar_row_type(elem)
}

fn scalar_row_type(ty: &Type) -> RowType {
    match ty {
        Type::Record(fields) => {
            RowType::new(fields.iter().map(|(n, t)| ColumnType { name: Some(n.clone()), ty: t.clone() }).collect())
        }
        other => RowType::new(vec![ColumnType { name: None, ty: other.clone() }]),
    }
}

fn value_scalar_type(value: &Value) -> Type {
    match value {
        Value::Bool(_) => Type::Prim(PrimType::Bool),
        Value::Char(_) | Value::String(_) => Type::Prim(PrimType::String),
        Value::Int(_) => Type::Prim(PrimType::Int),
        Value::Real(_) => Type::Prim(PrimType::Real),
        Value::Unit | Value::Foreign(_) | Value::List(_) => Type::Prim(PrimType::Unit),
    }
}

fn lower_list_literal(builder: &mut dyn RelBuilder, items: &[Value]) -> bool {
    let ty = items.first().map(value_scalar_type).unwrap_or(Type::Prim(PrimType::Unit));
    builder.values(RowType::new(vec![ColumnType { name: None, ty }]), items.len());
    true
}

/// §4.6.1 set operators. `items` is the tuple of sub-queries; each is
/// lowered independently, harmonised to a common row type (§4.6.4), then
/// combined with `union`/`minus`/`intersect` (`union` keeps duplicates,
/// the other two don't — spec.md §4.6.1).
fn lower_set_op(env: &Environment, builder: &mut dyn RelBuilder, op_name: &str, subs: &[Expr]) -> bool {
    if subs.is_empty() {
        return false;
    }
    let mut nodes = Vec::with_capacity(subs.len());
    for sub in subs {
        match lower_to_node(env, builder, sub) {
            Some(node) => nodes.push(node),
            None => return false,
        }
    }
    let harmonized = harmonize(builder, nodes);
    let count = harmonized.len();
    for node in harmonized {
        builder.push(node);
    }
    match op_name {
        "union" => builder.union(true, count),
        "except" => builder.minus(false, count),
        "intersect" => builder.intersect(false, count),
        _ => unreachable!("only the three names above are dispatched here"),
    }
    true
}

fn insert_var(map: &mut VariableMap, name: &str, offset: usize, width: usize, fields: Vec<String>) {
    let var = if width == 1 && fields.is_empty() {
        VarRef::Scalar(offset)
    } else {
        VarRef::Range { range: ColRange { offset, width }, fields }
    };
    map.insert(name.to_string(), var);
}

/// §4.6.2: lower a `from` expression.
fn lower_from(env: &Environment, builder: &mut dyn RelBuilder, from: &FromExpr) -> bool {
    let sources = from.sources();
    if sources.is_empty() {
        return false;
    }

    // A single bare source with no further steps lowers straight to the
    // underlying relation, with no project/filter at all — scenario A.
    if sources.len() == 1 && from.body_steps().is_empty() {
        let Step::Scan { pat, exp } = &sources[0] else { unreachable!() };
        if crate::core::pat::simple_name(pat).is_some() {
            return try_lower(env, builder, exp);
        }
    }

    // Step 1: push every source, aliasing it and inner-joining it onto
    // the running relation after the first.
    let mut env_ext = env.clone();
    let mut infos: Vec<(String, RowType)> = Vec::with_capacity(sources.len());
    for (i, src) in sources.iter().enumerate() {
        let Step::Scan { pat, exp } = src else { unreachable!() };
        let Some(name) = crate::core::pat::simple_name(pat) else { return false };
        if !try_lower(&env_ext, builder, exp) {
            return false;
        }
        builder.as_alias(name);
        let row_type = builder.peek_row_type();
        infos.push((name.to_string(), row_type));
        if i > 0 {
            builder.join(JoinType::Inner);
        }
        env_ext = env_ext.bind(Binding::val(Id::plain(name.to_string())));
    }

    // Offsets of each source's column block in the (unpermuted) join chain.
    let mut offsets = Vec::with_capacity(infos.len());
    let mut running = 0usize;
    for (_, row_type) in &infos {
        offsets.push(running);
        running += row_type.width();
    }

    // Step 2: permute into name-sorted source order (only meaningful,
    // and only emitted, when there is more than one source).
    let mut sorted: Vec<usize> = (0..infos.len()).collect();
    sorted.sort_by(|&a, &b| infos[a].0.cmp(&infos[b].0));

    let mut variable_map = VariableMap::new();
    if infos.len() > 1 {
        let mut exps = Vec::new();
        let mut new_offset = 0usize;
        for &idx in &sorted {
            let (name, row_type) = &infos[idx];
            for col in 0..row_type.width() {
                exps.push(builder.field(offsets[idx] + col));
            }
            let fields = row_type.columns.iter().filter_map(|c| c.name.clone()).collect();
            insert_var(&mut variable_map, name, new_offset, row_type.width(), fields);
            new_offset += row_type.width();
        }
        builder.project(exps, None);
    } else {
        let (name, row_type) = &infos[0];
        let fields = row_type.columns.iter().filter_map(|c| c.name.clone()).collect();
        insert_var(&mut variable_map, name, 0, row_type.width(), fields);
    }

    // Step 4: walk the body steps (where/order/group; scan never
    // appears here, only in `sources`).
    for step in from.body_steps() {
        match step {
            Step::Where(exp) => {
                let Some(rex) = translate(&env_ext, builder, &variable_map, exp) else { return false };
                builder.filter(rex);
            }
            Step::Order(items) => {
                let mut exps = Vec::with_capacity(items.len());
                for (exp, dir) in items {
                    let Some(rex) = translate(&env_ext, builder, &variable_map, exp) else { return false };
                    exps.push(if *dir == Direction::Descending { builder.desc(rex) } else { rex });
                }
                builder.sort(exps);
            }
            Step::Group { keys, aggs } => match lower_group(&env_ext, builder, &variable_map, keys, aggs) {
                Some(new_map) => variable_map = new_map,
                None => return false,
            },
            // The trailing `yield`, if any, is handled separately below
            // once the variable map it needs is fully up to date.
            Step::Yield(_) => {}
            Step::Scan { .. } => unreachable!("scan is only valid as a source"),
        }
    }

    // Step 5: the final yield, explicit or implicit — skipped when the
    // last step was a `group` with no explicit yield, since the group's
    // own re-projection already produced the canonical output row.
    let last_is_bare_group =
        matches!(from.body_steps().last(), Some(Step::Group { .. })) && from.explicit_yield().is_none();
    if !last_is_bare_group {
        let yield_expr = match from.explicit_yield() {
            Some(e) => e.clone(),
            None => implicit_yield(&from.steps),
        };
        let Some((exps, names)) = lower_yield(&env_ext, builder, &variable_map, &yield_expr) else { return false };
        builder.project(exps, names);
    }

    true
}

/// §4.6.2 "group" bullet: translate key expressions and aggregate calls,
/// emit `aggregate`, then re-project the output columns in name-sorted
/// order and rebuild the variable map so every output field is a bare
/// column reference (testable property 7).
fn lower_group(
    env: &Environment,
    builder: &mut dyn RelBuilder,
    variable_map: &VariableMap,
    keys: &[(String, Expr)],
    aggs: &[AggCall],
) -> Option<VariableMap> {
    let mut group_key = Vec::with_capacity(keys.len());
    for (_, key_exp) in keys {
        let RexNode::Field(idx) = translate(env, builder, variable_map, key_exp)? else { return None };
        group_key.push(idx);
    }

    let mut agg_calls = Vec::with_capacity(aggs.len());
    for agg in aggs {
        let op = resolve_agg_op(&agg.op)?;
        let arg = match &agg.arg {
            Some(e) => Some(translate(env, builder, variable_map, e)?),
            None => None,
        };
        agg_calls.push(AggCallSpec { op, arg, name: agg.name.clone() });
    }

    builder.aggregate(group_key, agg_calls.clone());

    let mut names: Vec<String> = keys.iter().map(|(n, _)| n.clone()).collect();
    names.extend(agg_calls.iter().map(|a| a.name.clone()));
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by(|&a, &b| names[a].cmp(&names[b]));

    let exps: Vec<RexNode> = order.iter().map(|&i| builder.field(i)).collect();
    let sorted_names: Vec<String> = order.iter().map(|&i| names[i].clone()).collect();
    builder.project(exps, Some(sorted_names.clone()));

    let mut new_map = VariableMap::new();
    for (idx, name) in sorted_names.into_iter().enumerate() {
        new_map.insert(name, VarRef::Scalar(idx));
    }
    Some(new_map)
}

/// §4.6.2 step 5 / §4.6.5: translate the (explicit or implicit) yield
/// expression into the final projection's column list, sorting a
/// record's fields by name (the canonical row layout this pipeline
/// maintains throughout).
fn lower_yield(
    env: &Environment,
    builder: &mut dyn RelBuilder,
    variable_map: &VariableMap,
    expr: &Expr,
) -> Option<(Vec<RexNode>, Option<Vec<String>>)> {
    match expr {
        Expr::Tuple(items) => {
            let exps: Option<Vec<RexNode>> =
                items.iter().map(|e| translate(env, builder, variable_map, e)).collect();
            Some((exps?, None))
        }
        Expr::Record(fields) => {
            let mut sorted = fields.clone();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            let exps: Option<Vec<RexNode>> =
                sorted.iter().map(|(_, e)| translate(env, builder, variable_map, e)).collect();
            let names = sorted.into_iter().map(|(n, _)| n).collect();
            Some((exps?, Some(names)))
        }
        other => {
            let rex = translate(env, builder, variable_map, other)?;
            Some((vec![rex], None))
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
