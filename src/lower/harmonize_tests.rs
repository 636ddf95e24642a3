use super::*;
use crate::core::{PrimType, Type};
use crate::lower::builder::{ColumnType, RowType, StackRelBuilder};

fn row(ty: Type) -> RowType {
    RowType::new(vec![ColumnType { name: None, ty }])
}

#[test]
fn inputs_with_matching_row_types_are_unchanged() {
    let mut builder = StackRelBuilder::new();
    let a = RelNode::Values { row_type: row(Type::Prim(PrimType::Int)), row_count: 1 };
    let b = RelNode::Values { row_type: row(Type::Prim(PrimType::Int)), row_count: 1 };
    let result = harmonize(&mut builder, vec![a.clone(), b.clone()]);
    assert_eq!(result, vec![a, b]);
}

#[test]
fn mismatched_inputs_get_converted_and_keep_original_order() {
    let mut builder = StackRelBuilder::new();
    let a = RelNode::Values { row_type: row(Type::Prim(PrimType::Int)), row_count: 1 };
    let b = RelNode::Values { row_type: row(Type::Prim(PrimType::String)), row_count: 1 };
    let result = harmonize(&mut builder, vec![a, b]);
    assert_eq!(result.len(), 2);
    assert!(matches!(&result[0], RelNode::Convert { .. }));
    assert!(matches!(&result[1], RelNode::Convert { .. }));
    assert_eq!(result[0].row_type(), result[1].row_type());
}
