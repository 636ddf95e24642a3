//! C8: the relational builder contract (spec.md §6 "Relational builder"),
//! plus one concrete, in-process implementation.
//!
//! This crate never executes a plan — `RelBuilder` is a trait contract
//! an embedder supplies (mirroring Apache Calcite's `RelBuilder`/
//! `RexBuilder`, which spec.md §6 references directly via
//! `getRexBuilder().makeRangeReference`). `StackRelBuilder` is a
//! reference implementation good enough to exercise and test C7 against,
//! grounded on `plotnik-compiler::compile::compiler::CompilerBuilder`'s
//! builder-holds-mutable-accumulator-state shape.

use crate::core::{PrimType, Type, Value};

/// One column of a [`RowType`]: an optional field name and its scalar
/// type.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnType {
    pub name: Option<String>,
    pub ty: Type,
}

/// The row shape of a relation: a flat, ordered list of scalar columns
/// (records are flattened to their field columns at this layer).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RowType {
    pub columns: Vec<ColumnType>,
}

impl RowType {
    pub fn new(columns: Vec<ColumnType>) -> Self {
        RowType { columns }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn empty() -> Self {
        RowType::default()
    }
}

/// A half-open range of columns within a row, e.g. the fields
/// contributed by one `from` source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColRange {
    pub offset: usize,
    pub width: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    /// Only `INNER` is used (spec.md §6: "only `INNER` used").
    Inner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    Minus,
    Intersect,
}

/// One of the aggregate operators recognized by `lower::aggregate`
/// (spec.md §4.6.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggOp {
    Sum,
    Count,
    Min,
    Max,
}

/// One `aggregateCall(op, args).as(name)` (spec.md §6).
#[derive(Clone, Debug, PartialEq)]
pub struct AggCallSpec {
    pub op: AggOp,
    pub arg: Option<RexNode>,
    pub name: String,
}

/// A scalar/row expression over the builder's current row
/// (spec.md §6's `field`/`literal`/`call` family).
#[derive(Clone, Debug, PartialEq)]
pub enum RexNode {
    /// `field(index)` — a single column of the current row.
    Field(usize),
    /// `field(range, name)` — the range of columns one source
    /// contributed, addressed as a unit (a record-typed variable).
    FieldRange(ColRange),
    Literal(Value),
    Call { op: String, args: Vec<RexNode> },
    /// `ROW(...)` with positional field names, built from a tuple.
    Row(Vec<RexNode>),
    /// `desc(exp)` — wraps a sort key as descending.
    Desc(Box<RexNode>),
}

/// A node of the relational plan the builder assembles — what `build()`
/// pops off the stack and what [`crate::Tracer::on_plan`] observes.
#[derive(Clone, Debug, PartialEq)]
pub enum RelNode {
    /// A foreign relation reference, pushed directly by `push`.
    Scan { name: String, row_type: RowType },
    Values { row_type: RowType, row_count: usize },
    Project { input: Box<RelNode>, exps: Vec<RexNode>, row_type: RowType },
    Filter { input: Box<RelNode>, cond: RexNode },
    Sort { input: Box<RelNode>, keys: Vec<RexNode> },
    Join { left: Box<RelNode>, right: Box<RelNode>, join_type: JoinType, row_type: RowType },
    Aggregate { input: Box<RelNode>, group_key: Vec<usize>, calls: Vec<AggCallSpec>, row_type: RowType },
    SetOp { kind: SetOpKind, all: bool, inputs: Vec<RelNode>, row_type: RowType },
    Convert { input: Box<RelNode>, row_type: RowType },
}

impl RelNode {
    /// The row type the node produces.
    pub fn row_type(&self) -> &RowType {
        match self {
            RelNode::Scan { row_type, .. }
            | RelNode::Values { row_type, .. }
            | RelNode::Project { row_type, .. }
            | RelNode::Join { row_type, .. }
            | RelNode::Aggregate { row_type, .. }
            | RelNode::SetOp { row_type, .. }
            | RelNode::Convert { row_type, .. } => row_type,
            RelNode::Filter { input, .. } | RelNode::Sort { input, .. } => input.row_type(),
        }
    }
}

/// The relational-builder contract C7 lowers against (spec.md §6).
///
/// Calls mutate a conceptual stack of partially-built relations: `push`,
/// `project`, `filter`, `sort`, `aggregate` and the set operators all
/// replace their input(s) with one new top-of-stack relation; `build`
/// pops and returns it.
pub trait RelBuilder {
    fn push(&mut self, relation: RelNode);
    fn as_alias(&mut self, alias: &str);
    fn values(&mut self, row_type: RowType, row_count: usize);

    fn field(&self, index: usize) -> RexNode;
    fn field_range(&self, range: ColRange, name: &str) -> RexNode;
    fn literal(&self, value: Value) -> RexNode;
    fn call(&self, op: &str, args: Vec<RexNode>) -> RexNode;

    fn project(&mut self, exps: Vec<RexNode>, names: Option<Vec<String>>);
    fn filter(&mut self, exp: RexNode);
    fn sort(&mut self, exps: Vec<RexNode>);
    fn join(&mut self, join_type: JoinType);

    fn union(&mut self, all: bool, input_count: usize);
    fn minus(&mut self, all: bool, input_count: usize);
    fn intersect(&mut self, all: bool, input_count: usize);

    fn aggregate(&mut self, group_key: Vec<usize>, agg_calls: Vec<AggCallSpec>);

    fn least_restrictive(&self, row_types: &[RowType]) -> RowType;
    fn convert(&mut self, row_type: RowType);
    fn desc(&self, exp: RexNode) -> RexNode;
    fn make_range_reference(&self, row_type: &RowType, offset: usize) -> RexNode;

    /// The row type of the current top-of-stack relation. Not part of
    /// spec.md §6's call list verbatim, but required for C7 to compute
    /// permutations and `variableMap` offsets without re-deriving row
    /// types by hand; every real `RelBuilder` tracks this internally
    /// anyway (Calcite's does, via `peek().getRowType()`).
    fn peek_row_type(&self) -> RowType;

    fn build(&mut self) -> RelNode;
}

/// A `RelBuilder` backed by an explicit `Vec<RelNode>` stack — enough to
/// drive and test C7 without a real catalog or execution engine.
#[derive(Default)]
pub struct StackRelBuilder {
    stack: Vec<RelNode>,
}

impl StackRelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn pop(&mut self) -> RelNode {
        self.stack.pop().expect("RelBuilder: pop on empty stack")
    }

    fn peek(&self) -> &RelNode {
        self.stack.last().expect("RelBuilder: peek on empty stack")
    }
}

fn row_type_from_calls(calls: &[AggCallSpec], group_key_types: &[ColumnType]) -> RowType {
    let mut columns = group_key_types.to_vec();
    columns.extend(calls.iter().map(|c| ColumnType {
        name: Some(c.name.clone()),
        ty: Type::Prim(PrimType::Int),
    }));
    RowType::new(columns)
}

impl RelBuilder for StackRelBuilder {
    fn push(&mut self, relation: RelNode) {
        self.stack.push(relation);
    }

    fn as_alias(&mut self, _alias: &str) {
        // Aliasing is metadata for name resolution, carried by the
        // caller's `variableMap`; the plan itself is alias-agnostic.
    }

    fn values(&mut self, row_type: RowType, row_count: usize) {
        self.stack.push(RelNode::Values { row_type, row_count });
    }

    fn field(&self, index: usize) -> RexNode {
        RexNode::Field(index)
    }

    fn field_range(&self, range: ColRange, _name: &str) -> RexNode {
        RexNode::FieldRange(range)
    }

    fn literal(&self, value: Value) -> RexNode {
        RexNode::Literal(value)
    }

    fn call(&self, op: &str, args: Vec<RexNode>) -> RexNode {
        RexNode::Call { op: op.to_string(), args }
    }

    fn project(&mut self, exps: Vec<RexNode>, names: Option<Vec<String>>) {
        let input = self.pop();
        let names = names.unwrap_or_default();
        let columns = exps
            .iter()
            .enumerate()
            .map(|(i, _)| ColumnType { name: names.get(i).cloned(), ty: Type::Prim(PrimType::Unit) })
            .collect();
        self.stack.push(RelNode::Project { input: Box::new(input), exps, row_type: RowType::new(columns) });
    }

    fn filter(&mut self, exp: RexNode) {
        let input = self.pop();
        self.stack.push(RelNode::Filter { input: Box::new(input), cond: exp });
    }

    fn sort(&mut self, exps: Vec<RexNode>) {
        let input = self.pop();
        self.stack.push(RelNode::Sort { input: Box::new(input), keys: exps });
    }

    fn join(&mut self, join_type: JoinType) {
        let right = self.pop();
        let left = self.pop();
        let mut columns = left.row_type().columns.clone();
        columns.extend(right.row_type().columns.clone());
        self.stack.push(RelNode::Join {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            row_type: RowType::new(columns),
        });
    }

    fn union(&mut self, all: bool, input_count: usize) {
        set_op(self, SetOpKind::Union, all, input_count);
    }

    fn minus(&mut self, all: bool, input_count: usize) {
        set_op(self, SetOpKind::Minus, all, input_count);
    }

    fn intersect(&mut self, all: bool, input_count: usize) {
        set_op(self, SetOpKind::Intersect, all, input_count);
    }

    fn aggregate(&mut self, group_key: Vec<usize>, agg_calls: Vec<AggCallSpec>) {
        let input = self.pop();
        let group_key_types: Vec<ColumnType> =
            group_key.iter().map(|&i| input.row_type().columns[i].clone()).collect();
        let row_type = row_type_from_calls(&agg_calls, &group_key_types);
        self.stack.push(RelNode::Aggregate { input: Box::new(input), group_key, calls: agg_calls, row_type });
    }

    fn least_restrictive(&self, row_types: &[RowType]) -> RowType {
        let Some(first) = row_types.first() else { return RowType::empty() };
        let width = first.width();
        let columns = (0..width)
            .map(|i| {
                let candidates: Vec<&ColumnType> = row_types.iter().map(|rt| &rt.columns[i]).collect();
                let name = candidates[0].name.clone();
                let ty = candidates
                    .iter()
                    .map(|c| c.ty.clone())
                    .reduce(widen)
                    .unwrap_or(Type::Prim(PrimType::Unit));
                ColumnType { name, ty }
            })
            .collect();
        RowType::new(columns)
    }

    fn convert(&mut self, row_type: RowType) {
        let input = self.pop();
        self.stack.push(RelNode::Convert { input: Box::new(input), row_type });
    }

    fn desc(&self, exp: RexNode) -> RexNode {
        RexNode::Desc(Box::new(exp))
    }

    fn make_range_reference(&self, row_type: &RowType, offset: usize) -> RexNode {
        RexNode::FieldRange(ColRange { offset, width: row_type.width() })
    }

    fn peek_row_type(&self) -> RowType {
        self.peek().row_type().clone()
    }

    fn build(&mut self) -> RelNode {
        self.pop()
    }
}

fn set_op(builder: &mut StackRelBuilder, kind: SetOpKind, all: bool, input_count: usize) {
    let mut inputs: Vec<RelNode> = (0..input_count).map(|_| builder.pop()).collect();
    inputs.reverse();
    let row_type = inputs.first().map(|r| r.row_type().clone()).unwrap_or_default();
    builder.stack.push(RelNode::SetOp { kind, all, inputs, row_type });
}

/// The least-restrictive (widening) combination of two column types: the
/// same type if they agree, otherwise a conservative `Unit` placeholder
/// — this crate has no numeric-tower promotion rules of its own to
/// widen with, since type inference is out of scope (spec.md §1).
fn widen(a: Type, b: Type) -> Type {
    if a == b {
        a
    } else {
        Type::Prim(PrimType::Unit)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
