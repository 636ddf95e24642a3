//! C7/C8: lowering a core `from` comprehension (and its sibling shapes)
//! to a relational plan through an external builder contract.

pub mod aggregate;
pub mod builder;
pub mod harmonize;
pub mod query;
pub mod translate;

pub use aggregate::resolve_agg_op;
pub use builder::{
    AggCallSpec, AggOp, ColRange, ColumnType, JoinType, RelBuilder, RelNode, RexNode, RowType, SetOpKind,
    StackRelBuilder,
};
pub use harmonize::harmonize;
pub use query::try_lower;
pub use translate::{translate, VarRef, VariableMap};
