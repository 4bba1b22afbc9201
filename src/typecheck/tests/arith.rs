use serde_json::json;

use super::*;
use crate::error::Category;
use crate::types::TypeId;

fn binary(prim: &str, a: Type, b: Type) -> Result<StackType, Error> {
    check(json!({"prim": prim}), &[a, b])
}

fn result_of(prim: &str, a: Type, b: Type) -> Type {
    match binary(prim, a, b) {
        Ok(StackType::Live(s)) => s[0].clone(),
        other => panic!("{} failed: {:?}", prim, other),
    }
}

#[test]
fn test_add_table() {
    assert_eq!(result_of("ADD", Type::nat(), Type::nat()), Type::nat());
    assert_eq!(result_of("ADD", Type::nat(), Type::int()), Type::int());
    assert_eq!(result_of("ADD", Type::int(), Type::nat()), Type::int());
    assert_eq!(result_of("ADD", Type::int(), Type::int()), Type::int());
    assert_eq!(result_of("ADD", Type::timestamp(), Type::int()), Type::timestamp());
    assert_eq!(result_of("ADD", Type::int(), Type::timestamp()), Type::timestamp());
    assert_eq!(result_of("ADD", Type::mutez(), Type::mutez()), Type::mutez());
}

#[test]
fn test_add_rejects_mixed_mutez() {
    assert_eq!(
        code_err(json!({"prim": "ADD"}), &[Type::mutez(), Type::nat()]),
        CodeErrorReason::IncompatibleOperandTypes(TypeId::Mutez, TypeId::Nat)
    );
    assert_eq!(
        code_err(json!({"prim": "ADD"}), &[Type::nat(), Type::timestamp()]),
        CodeErrorReason::IncompatibleOperandTypes(TypeId::Nat, TypeId::Timestamp)
    );
    assert_eq!(
        code_err(json!({"prim": "ADD"}), &[Type::string(), Type::nat()]),
        CodeErrorReason::StackTypeMismatch {
            slot: 0,
            expected: vec![TypeId::Nat, TypeId::Int, TypeId::Timestamp, TypeId::Mutez],
            found: TypeId::String,
        }
    );
}

#[test]
fn test_sub_table() {
    assert_eq!(result_of("SUB", Type::nat(), Type::nat()), Type::int());
    assert_eq!(result_of("SUB", Type::int(), Type::nat()), Type::int());
    assert_eq!(result_of("SUB", Type::timestamp(), Type::timestamp()), Type::int());
    assert_eq!(result_of("SUB", Type::timestamp(), Type::int()), Type::timestamp());
    assert_eq!(result_of("SUB", Type::mutez(), Type::mutez()), Type::mutez());
    assert!(binary("SUB", Type::int(), Type::timestamp()).is_err());
}

#[test]
fn test_mul_table() {
    assert_eq!(result_of("MUL", Type::nat(), Type::nat()), Type::nat());
    assert_eq!(result_of("MUL", Type::nat(), Type::int()), Type::int());
    assert_eq!(result_of("MUL", Type::mutez(), Type::nat()), Type::mutez());
    assert_eq!(result_of("MUL", Type::nat(), Type::mutez()), Type::mutez());
    assert_eq!(
        code_err(json!({"prim": "MUL"}), &[Type::mutez(), Type::mutez()]),
        CodeErrorReason::IncompatibleOperandTypes(TypeId::Mutez, TypeId::Mutez)
    );
}

#[test]
fn test_ediv_table() {
    let opt = |q: Type, r: Type| Type::option(Type::pair(q, r));
    assert_eq!(result_of("EDIV", Type::nat(), Type::nat()), opt(Type::int(), Type::nat()));
    assert_eq!(result_of("EDIV", Type::int(), Type::nat()), opt(Type::int(), Type::nat()));
    assert_eq!(result_of("EDIV", Type::mutez(), Type::nat()), opt(Type::mutez(), Type::mutez()));
    assert_eq!(result_of("EDIV", Type::mutez(), Type::mutez()), opt(Type::nat(), Type::mutez()));
    assert!(binary("EDIV", Type::nat(), Type::mutez()).is_err());
}

#[test]
fn test_unary_numeric() {
    assert_eq!(live(json!({"prim": "ABS"}), &[Type::int()]), vec![Type::nat()]);
    assert_eq!(
        live(json!({"prim": "ISNAT"}), &[Type::int()]),
        vec![Type::option(Type::nat())]
    );
    assert_eq!(live(json!({"prim": "INT"}), &[Type::nat()]), vec![Type::int()]);
    assert_eq!(live(json!({"prim": "NEG"}), &[Type::nat()]), vec![Type::int()]);
    assert_eq!(live(json!({"prim": "NEG"}), &[Type::int()]), vec![Type::int()]);
    assert!(check(json!({"prim": "INT"}), &[Type::int()]).is_err());
}

#[test]
fn test_shifts() {
    assert_eq!(result_of("LSL", Type::nat(), Type::nat()), Type::nat());
    assert_eq!(result_of("LSR", Type::nat(), Type::nat()), Type::nat());
    assert!(binary("LSL", Type::int(), Type::nat()).is_err());
}

#[test]
fn test_bitwise() {
    assert_eq!(result_of("OR", Type::bool(), Type::bool()), Type::bool());
    assert_eq!(result_of("XOR", Type::nat(), Type::nat()), Type::nat());
    assert_eq!(
        code_err(json!({"prim": "OR"}), &[Type::nat(), Type::bool()]),
        CodeErrorReason::OperandsDiffer(TypeId::Nat, TypeId::Bool)
    );
    assert_eq!(result_of("AND", Type::bool(), Type::bool()), Type::bool());
    assert_eq!(result_of("AND", Type::int(), Type::nat()), Type::nat());
    assert!(binary("AND", Type::nat(), Type::int()).is_err());
    assert!(binary("AND", Type::int(), Type::int()).is_err());
}

#[test]
fn test_not() {
    assert_eq!(live(json!({"prim": "NOT"}), &[Type::bool()]), vec![Type::bool()]);
    assert_eq!(live(json!({"prim": "NOT"}), &[Type::nat()]), vec![Type::int()]);
    assert_eq!(live(json!({"prim": "NOT"}), &[Type::int()]), vec![Type::int()]);
}

#[test]
fn test_compare_and_tests() {
    assert_eq!(result_of("COMPARE", Type::string(), Type::string()), Type::int());
    let pair = Type::pair(Type::nat(), Type::string());
    assert_eq!(result_of("COMPARE", pair.clone(), pair), Type::int());
    for prim in ["EQ", "NEQ", "LT", "GT", "LE", "GE"] {
        assert_eq!(live(json!({"prim": prim}), &[Type::int()]), vec![Type::bool()]);
    }
}

#[test]
fn test_compare_rejects_incomparable_or_mixed() {
    assert_eq!(
        code_err(json!({"prim": "COMPARE"}), &[Type::key(), Type::key()]),
        CodeErrorReason::NotComparable(Type::key())
    );
    let err = binary("COMPARE", Type::nat(), Type::int()).unwrap_err();
    assert_eq!(err.category(), Category::StructuralType);
}

#[test]
fn test_result_takes_variable_name() {
    let out = live(
        json!({"prim": "ADD", "annots": ["@sum"]}),
        &[Type::nat(), Type::nat()],
    );
    assert_eq!(out[0].to_string(), "(nat @sum)");
}

#[test]
fn test_incompatible_operands_message() {
    let err = binary("ADD", Type::mutez(), Type::nat()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"ADD: incompatible operand types: mutez, nat");
}
