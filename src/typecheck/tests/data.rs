use serde_json::json;

use super::*;
use crate::error::Category;
use crate::types::TypeId;

fn ok(t: serde_json::Value, d: serde_json::Value) {
    if let Err(e) = validate(t.clone(), d.clone()) {
        panic!("{} should accept {}: {}", t, d, e);
    }
}

// ── scalars ─────────────────────────────────────────────────────

#[test]
fn test_numbers() {
    ok(json!({"prim": "int"}), json!({"int": "-5"}));
    ok(json!({"prim": "int"}), json!({"int": "+5"}));
    ok(json!({"prim": "nat"}), json!({"int": "0"}));
    ok(json!({"prim": "mutez"}), json!({"int": "1000000"}));
    assert_eq!(
        data_err(json!({"prim": "int"}), json!({"int": "1.5"})),
        DataErrorReason::Expected("integer value")
    );
    assert_eq!(
        data_err(json!({"prim": "int"}), json!({"string": "5"})),
        DataErrorReason::Expected("integer value")
    );
    assert_eq!(
        data_err(json!({"prim": "mutez"}), json!({"int": "-1"})),
        DataErrorReason::Expected("natural value")
    );
}

#[test]
fn test_strings_and_bytes() {
    ok(json!({"prim": "string"}), json!({"string": "hello"}));
    ok(json!({"prim": "bytes"}), json!({"bytes": "deadbeef"}));
    ok(json!({"prim": "bytes"}), json!({"bytes": ""}));
    assert_eq!(
        data_err(json!({"prim": "bytes"}), json!({"bytes": "0xzz"})),
        DataErrorReason::Expected("bytes value")
    );
    ok(json!({"prim": "bytes"}), json!({"bytes": "0xab"}));
    assert_eq!(
        data_err(json!({"prim": "bytes"}), json!({"bytes": "0x0xab"})),
        DataErrorReason::Expected("bytes value")
    );
    assert_eq!(
        data_err(json!({"prim": "string"}), json!({"int": "1"})),
        DataErrorReason::Expected("string value")
    );
}

#[test]
fn test_bool_and_unit() {
    ok(json!({"prim": "bool"}), json!({"prim": "True"}));
    ok(json!({"prim": "bool"}), json!({"prim": "False"}));
    ok(json!({"prim": "unit"}), json!({"prim": "Unit"}));
    assert_eq!(
        data_err(json!({"prim": "bool"}), json!({"string": "true"})),
        DataErrorReason::Expected("boolean value")
    );
    assert_eq!(
        data_err(json!({"prim": "unit"}), json!({"prim": "Unit", "args": [{"int": "0"}]})),
        DataErrorReason::Expected("unit value")
    );
}

#[test]
fn test_timestamps() {
    ok(json!({"prim": "timestamp"}), json!({"string": "2019-09-26T10:59:51Z"}));
    ok(json!({"prim": "timestamp"}), json!({"string": "2019-09-26T10:59:51.123+02:00"}));
    ok(json!({"prim": "timestamp"}), json!({"int": "1571659294"}));
    ok(json!({"prim": "timestamp"}), json!({"string": "1571659294"}));
    for bad in ["yesterday", "2019-13-01T00:00:00Z", "2019-09-26 10:59:51"] {
        assert_eq!(
            data_err(json!({"prim": "timestamp"}), json!({"string": bad})),
            DataErrorReason::Expected("timestamp")
        );
    }
}

#[test]
fn test_operation_and_contract_have_no_literal() {
    assert_eq!(
        data_err(json!({"prim": "operation"}), json!({"bytes": "00"})),
        DataErrorReason::NoLiteral(TypeId::Operation)
    );
    assert_eq!(
        data_err(
            json!({"prim": "contract", "args": [{"prim": "unit"}]}),
            json!({"string": id(IdKind::ContractHash, 1)})
        ),
        DataErrorReason::NoLiteral(TypeId::Contract)
    );
}

// ── identifiers ─────────────────────────────────────────────────

#[test]
fn test_key_hash() {
    ok(json!({"prim": "key_hash"}), json!({"string": id(IdKind::Ed25519PublicKeyHash, 1)}));
    ok(json!({"prim": "key_hash"}), json!({"string": id(IdKind::P256PublicKeyHash, 2)}));
    ok(json!({"prim": "key_hash"}), json!({"string": "tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx"}));
    assert_eq!(
        data_err(json!({"prim": "key_hash"}), json!({"string": id(IdKind::ContractHash, 1)})),
        DataErrorReason::Expected("key hash")
    );
    assert_eq!(
        data_err(json!({"prim": "key_hash"}), json!({"string": "tz1notbase58check"})),
        DataErrorReason::Expected("key hash")
    );
}

#[test]
fn test_address() {
    ok(json!({"prim": "address"}), json!({"string": id(IdKind::Secp256k1PublicKeyHash, 3)}));
    let kt1 = id(IdKind::ContractHash, 4);
    ok(json!({"prim": "address"}), json!({"string": kt1.clone()}));
    ok(json!({"prim": "address"}), json!({"string": format!("{}%deposit", kt1)}));
    assert_eq!(
        data_err(json!({"prim": "address"}), json!({"string": id(IdKind::Ed25519PublicKey, 4)})),
        DataErrorReason::Expected("address")
    );
}

#[test]
fn test_keys_and_signatures() {
    ok(json!({"prim": "key"}), json!({"string": id(IdKind::Ed25519PublicKey, 5)}));
    ok(json!({"prim": "key"}), json!({"string": id(IdKind::Secp256k1PublicKey, 5)}));
    ok(json!({"prim": "signature"}), json!({"string": id(IdKind::Ed25519Signature, 6)}));
    ok(json!({"prim": "signature"}), json!({"string": id(IdKind::GenericSignature, 6)}));
    assert_eq!(
        data_err(json!({"prim": "signature"}), json!({"string": id(IdKind::P256PublicKey, 6)})),
        DataErrorReason::Expected("signature")
    );
    assert_eq!(
        data_err(json!({"prim": "key"}), json!({"bytes": "00"})),
        DataErrorReason::Expected("public key")
    );
}

#[test]
fn test_chain_id() {
    ok(json!({"prim": "chain_id"}), json!({"string": id(IdKind::ChainId, 7)}));
    ok(json!({"prim": "chain_id"}), json!({"bytes": "7a06a770"}));
    assert_eq!(
        data_err(json!({"prim": "chain_id"}), json!({"bytes": "7a06"})),
        DataErrorReason::Expected("chain id")
    );
}

// ── composites ──────────────────────────────────────────────────

#[test]
fn test_option_pair_or() {
    let opt = json!({"prim": "option", "args": [{"prim": "nat"}]});
    ok(opt.clone(), json!({"prim": "None"}));
    ok(opt.clone(), json!({"prim": "Some", "args": [{"int": "3"}]}));
    assert_eq!(
        data_err(opt.clone(), json!({"prim": "Some", "args": [{"string": "x"}]})),
        DataErrorReason::Expected("natural value")
    );
    assert_eq!(
        data_err(opt, json!({"prim": "Some"})),
        DataErrorReason::Expected("option")
    );

    let pair = json!({"prim": "pair", "args": [{"prim": "nat"}, {"prim": "string"}]});
    ok(pair.clone(), json!({"prim": "Pair", "args": [{"int": "1"}, {"string": "a"}]}));
    assert_eq!(
        data_err(pair, json!({"prim": "Left", "args": [{"int": "1"}]})),
        DataErrorReason::Expected("pair")
    );

    let or = json!({"prim": "or", "args": [{"prim": "nat"}, {"prim": "string"}]});
    ok(or.clone(), json!({"prim": "Left", "args": [{"int": "1"}]}));
    ok(or.clone(), json!({"prim": "Right", "args": [{"string": "r"}]}));
    assert_eq!(
        data_err(or, json!({"prim": "Right", "args": [{"int": "1"}]})),
        DataErrorReason::Expected("string value")
    );
}

#[test]
fn test_nested_error_path() {
    let err = validate(
        json!({"prim": "pair", "args": [{"prim": "nat"}, {"prim": "list", "args": [{"prim": "int"}]}]}),
        json!({"prim": "Pair", "args": [{"int": "1"}, [{"int": "2"}, {"string": "x"}]]}),
    )
    .unwrap_err();
    let indices: Vec<usize> = err.path.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 1]);
    assert_eq!(err.path[1].node, "\"x\"");
}

#[test]
fn test_list() {
    let list = json!({"prim": "list", "args": [{"prim": "nat"}]});
    ok(list.clone(), json!([]));
    ok(list.clone(), json!([{"int": "2"}, {"int": "1"}, {"int": "2"}]));
    assert_eq!(
        data_err(list.clone(), json!({"int": "1"})),
        DataErrorReason::Expected("list")
    );
    assert_eq!(
        data_err(list, json!([{"prim": "Elt", "args": [{"int": "1"}, {"int": "2"}]}])),
        DataErrorReason::EltOutsideMap
    );
}

#[test]
fn test_set_must_be_ordered() {
    let set = json!({"prim": "set", "args": [{"prim": "string"}]});
    ok(set.clone(), json!([{"string": "a"}, {"string": "b"}]));
    assert_eq!(
        data_err(set, json!([{"string": "b"}, {"string": "a"}])),
        DataErrorReason::UnorderedSetLiteral
    );

    let nats = json!({"prim": "set", "args": [{"prim": "nat"}]});
    ok(nats.clone(), json!([{"int": "3"}, {"int": "10"}]));
    assert_eq!(
        data_err(nats, json!([{"int": "10"}, {"int": "3"}])),
        DataErrorReason::UnorderedSetLiteral
    );
}

#[test]
fn test_set_of_pairs_ordered_lexicographically() {
    let set = json!({"prim": "set", "args": [{"prim": "pair", "args": [{"prim": "nat"}, {"prim": "string"}]}]});
    let p = |n: &str, s: &str| json!({"prim": "Pair", "args": [{"int": n}, {"string": s}]});
    ok(set.clone(), json!([p("1", "z"), p("2", "a"), p("2", "b")]));
    assert_eq!(
        data_err(set, json!([p("2", "b"), p("2", "a")])),
        DataErrorReason::UnorderedSetLiteral
    );
}

#[test]
fn test_set_needs_comparable_element() {
    let t = json!({"prim": "set", "args": [{"prim": "key"}]});
    assert_eq!(
        data_err(t, json!([])),
        DataErrorReason::NotComparable(Type::key())
    );
}

#[test]
fn test_map_must_be_ordered() {
    let map = json!({"prim": "map", "args": [{"prim": "nat"}, {"prim": "string"}]});
    let elt = |k: &str, v: &str| json!({"prim": "Elt", "args": [{"int": k}, {"string": v}]});
    ok(map.clone(), json!([elt("3", "x"), elt("5", "y")]));
    assert_eq!(
        data_err(map.clone(), json!([elt("5", "y"), elt("3", "x")])),
        DataErrorReason::UnorderedMapLiteral
    );
    assert_eq!(
        data_err(map.clone(), json!([elt("3", "x"), {"int": "5"}])),
        DataErrorReason::MapEltExpected
    );
    assert_eq!(
        data_err(map, json!([elt("3", "x"), {"prim": "Elt", "args": [{"int": "4"}, {"int": "0"}]}])),
        DataErrorReason::Expected("string value")
    );
}

#[test]
fn test_big_map_literal() {
    let map = json!({"prim": "big_map", "args": [{"prim": "string"}, {"prim": "nat"}]});
    ok(
        map,
        json!([{"prim": "Elt", "args": [{"string": "alice"}, {"int": "1"}]}]),
    );
}

// ── lambdas ─────────────────────────────────────────────────────

fn nat_to_nat() -> serde_json::Value {
    json!({"prim": "lambda", "args": [{"prim": "nat"}, {"prim": "nat"}]})
}

#[test]
fn test_lambda_literal() {
    ok(
        nat_to_nat(),
        json!([{"prim": "PUSH", "args": [{"prim": "nat"}, {"int": "1"}]}, {"prim": "ADD"}]),
    );
    ok(nat_to_nat(), json!([]));
}

#[test]
fn test_lambda_literal_failing_body() {
    assert_eq!(
        data_err(nat_to_nat(), json!([{"prim": "FAILWITH"}])),
        DataErrorReason::LambdaAlwaysFails(Type::nat())
    );
}

#[test]
fn test_lambda_literal_malformed() {
    assert_eq!(
        data_err(nat_to_nat(), json!({"prim": "ADD"})),
        DataErrorReason::Expected("function")
    );
    assert_eq!(
        data_err(nat_to_nat(), json!([{"prim": "FROBNICATE"}])),
        DataErrorReason::Expected("function")
    );
}

#[test]
fn test_lambda_literal_wrong_result() {
    let err = validate(nat_to_nat(), json!([{"prim": "INT"}])).unwrap_err();
    assert_eq!(err.category(), Category::StructuralType);
    let err = validate(nat_to_nat(), json!([{"prim": "DROP"}])).unwrap_err();
    assert_eq!(err.to_string(), "unequal stack lengths: 1 != 0");
}

#[test]
fn test_data_error_message() {
    let err = validate(json!({"prim": "nat"}), json!({"int": "-1"})).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"natural value expected: -1");
    let err = validate(
        json!({"prim": "set", "args": [{"prim": "string"}]}),
        json!([{"string": "b"}, {"string": "a"}]),
    )
    .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"set elements must be ordered: { "b" ; "a" }"#);
}
