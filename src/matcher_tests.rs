use super::*;
use crate::core::{Ctor, DataType, PrimType};

fn int_type() -> Type {
    Type::Prim(PrimType::Int)
}

fn emp_record_type() -> Type {
    Type::record(vec![("name".to_string(), Type::Prim(PrimType::String)), ("sal".to_string(), int_type())])
}

#[test]
fn extracts_value_between_val_name_equals_and_trailing_type() {
    assert_eq!(extract_value("val it = 3 : int"), "3");
    assert_eq!(extract_value("val it = {name=\"Ann\", sal=10} : {name:string, sal:int}"), "{name=\"Ann\", sal=10}");
}

#[test]
fn extract_value_ignores_colons_inside_strings_and_nesting() {
    // a record field value containing " : " must not be mistaken for the
    // trailing type annotation separator.
    let input = "val it = {label=\"a : b\"} : {label:string}";
    assert_eq!(extract_value(input), "{label=\"a : b\"}");
}

#[test]
fn extract_value_passes_through_input_with_no_val_prefix() {
    assert_eq!(extract_value("  [1,2,3]  : int list"), "[1,2,3]");
}

#[test]
fn normalize_whitespace_collapses_runs_outside_strings() {
    assert_eq!(normalize_whitespace("1,   2,\t\n3"), "1, 2, 3");
    assert_eq!(normalize_whitespace("\"a  b\""), "\"a  b\"");
}

#[test]
fn equivalent_scalars_ignore_surrounding_whitespace_and_type_suffix() {
    assert!(equivalent(&int_type(), "val it = 3 : int", "val it =   3 : int"));
    assert!(!equivalent(&int_type(), "val it = 3 : int", "val it = 4 : int"));
}

#[test]
fn equivalent_records_reorder_fields_before_comparing() {
    let ty = emp_record_type();
    let a = "{sal=10, name=\"Ann\"}";
    let b = "{name=\"Ann\", sal=10}";
    assert!(equivalent(&ty, a, b));
}

#[test]
fn equivalent_lists_are_permutation_sensitive() {
    let ty = Type::List(Box::new(int_type()));
    assert!(equivalent(&ty, "[1,2,3]", "[1,2,3]"));
    assert!(!equivalent(&ty, "[1,2,3]", "[3,2,1]"));
}

#[test]
fn equivalent_bags_are_permutation_invariant() {
    let ty = Type::Bag(Box::new(int_type()));
    assert!(equivalent(&ty, "[1,2,3]", "[3,1,2]"));
    assert!(!equivalent(&ty, "[1,2,3]", "[1,2,2]"));
}

#[test]
fn equivalent_is_commutative() {
    let ty = Type::Bag(Box::new(emp_record_type()));
    let a = "[{name=\"Ann\",sal=10}, {name=\"Bo\",sal=20}]";
    let b = "[{sal=20,name=\"Bo\"}, {sal=10,name=\"Ann\"}]";
    assert!(equivalent(&ty, a, b));
    assert!(equivalent(&ty, b, a));
}

#[test]
fn equivalent_tuples_compare_positionally() {
    let ty = Type::Tuple(vec![int_type(), Type::Prim(PrimType::String)]);
    assert!(equivalent(&ty, "(1, \"x\")", "(1,\"x\")"));
    assert!(!equivalent(&ty, "(1, \"x\")", "(2, \"x\")"));
}

#[test]
fn paren_wrapped_scalar_is_accepted_transparently() {
    assert!(equivalent(&int_type(), "(3)", "3"));
}

#[test]
fn equivalent_datatype_values_compare_ctor_then_argument() {
    let ty = Type::Data(DataType {
        name: "option".to_string(),
        ctors: vec![
            Ctor { name: "NONE".to_string(), arg: None },
            Ctor { name: "SOME".to_string(), arg: Some(Box::new(int_type())) },
        ],
        is_collection: false,
    });
    assert!(equivalent(&ty, "SOME 3", "SOME 3"));
    assert!(!equivalent(&ty, "SOME 3", "SOME 4"));
    assert!(!equivalent(&ty, "SOME 3", "NONE"));
    assert!(equivalent(&ty, "NONE", "NONE"));
}

#[test]
fn scenario_f_bag_of_records_matches_regardless_of_field_and_element_order() {
    let ty = Type::Bag(Box::new(emp_record_type()));
    let actual = "val it = [{name=\"Ann\",sal=10},{name=\"Bo\",sal=20}] : {name:string,sal:int} bag";
    let expected = "val it = [{sal=20,name=\"Bo\"},{sal=10,name=\"Ann\"}] : {name:string,sal:int} bag";
    assert!(equivalent(&ty, actual, expected));
}

#[test]
fn mismatched_shape_is_not_equivalent_rather_than_panicking() {
    let ty = Type::Tuple(vec![int_type(), int_type()]);
    assert!(!equivalent(&ty, "(1,2)", "[1,2]"));
    assert!(!equivalent(&ty, "not a value at all", "(1,2)"));
}
