//! Lowering of Micheline nodes into typed [`Type`], [`Instruction`] and
//! [`Script`] trees. Arity and argument shapes are fixed here, so the
//! checker never sees a malformed node.

use crate::annot::{AnnotationError, Annotations};
use crate::ast::{Body, Instr, Instruction, Op, Script};
use crate::types::{Type, TypeId};

use super::micheline::Node;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("unknown instruction: {0}")]
    UnknownInstruction(String),
    #[error("{prim}: expected {expected} argument(s), got {found}")]
    Arity {
        prim: String,
        expected: &'static str,
        found: usize,
    },
    #[error("{prim}: expected {expected}, got {found}")]
    UnexpectedArg {
        prim: String,
        expected: &'static str,
        found: String,
    },
    #[error("expected a type, got {0}")]
    ExpectedType(String),
    #[error("expected an instruction, got {0}")]
    ExpectedInstruction(String),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error("expected a script sequence, got {0}")]
    ExpectedScript(String),
    #[error("unknown top-level section: {0}")]
    UnknownSection(String),
    #[error("duplicate top-level section: {0}")]
    DuplicateSection(&'static str),
    #[error("missing top-level section: {0}")]
    MissingSection(&'static str),
    #[error("invalid Micheline JSON: {0}")]
    Json(String),
}

/// Lower a type expression.
pub fn lower_type(node: &Node) -> Result<Type, SyntaxError> {
    let Node::Prim { prim, args, annots } = node else {
        return Err(SyntaxError::ExpectedType(node.to_string()));
    };
    let id = TypeId::from_prim(prim).ok_or_else(|| SyntaxError::UnknownType(prim.clone()))?;
    if args.len() != id.arity() {
        return Err(SyntaxError::Arity {
            prim: prim.clone(),
            expected: arity_label(id.arity()),
            found: args.len(),
        });
    }
    let args = args.iter().map(lower_type).collect::<Result<Vec<_>, _>>()?;
    let ty = Type::from_parts(id, args).ok_or_else(|| SyntaxError::Arity {
        prim: prim.clone(),
        expected: arity_label(id.arity()),
        found: 0,
    })?;
    Ok(ty.with_annots(Annotations::parse(annots)?))
}

fn arity_label(n: usize) -> &'static str {
    match n {
        0 => "0",
        1 => "1",
        2 => "2",
        _ => "3",
    }
}

/// Lower an instruction or an instruction sequence.
pub fn lower_instruction(node: &Node) -> Result<Instruction, SyntaxError> {
    match node {
        Node::Seq(items) => items
            .iter()
            .map(lower_instruction)
            .collect::<Result<Vec<_>, _>>()
            .map(Instruction::Seq),
        Node::Prim { prim, args, annots } => {
            let op = lower_op(prim, args)?;
            Ok(Instruction::Instr(
                Instr::new(op).with_annots(Annotations::parse(annots)?),
            ))
        }
        _ => Err(SyntaxError::ExpectedInstruction(node.to_string())),
    }
}

fn expect_args(prim: &str, args: &[Node], expected: &'static str, n: usize) -> Result<(), SyntaxError> {
    if args.len() == n {
        Ok(())
    } else {
        Err(SyntaxError::Arity {
            prim: prim.to_string(),
            expected,
            found: args.len(),
        })
    }
}

fn lower_body(prim: &str, node: &Node) -> Result<Body, SyntaxError> {
    match node {
        Node::Seq(items) => items.iter().map(lower_instruction).collect(),
        other => Err(SyntaxError::UnexpectedArg {
            prim: prim.to_string(),
            expected: "an instruction sequence",
            found: other.to_string(),
        }),
    }
}

fn lower_count(prim: &str, node: &Node) -> Result<usize, SyntaxError> {
    match node {
        Node::Int { int } => int.parse::<usize>().map_err(|_| SyntaxError::UnexpectedArg {
            prim: prim.to_string(),
            expected: "a natural number",
            found: int.clone(),
        }),
        other => Err(SyntaxError::UnexpectedArg {
            prim: prim.to_string(),
            expected: "a natural number",
            found: other.to_string(),
        }),
    }
}

fn lower_op(prim: &str, args: &[Node]) -> Result<Op, SyntaxError> {
    if let Some(op) = Op::nullary(prim) {
        expect_args(prim, args, "0", 0)?;
        return Ok(op);
    }
    let op = match prim {
        "DROP" => match args {
            [] => Op::Drop(None),
            [n] => Op::Drop(Some(lower_count(prim, n)?)),
            _ => return Err(arity(prim, "0 or 1", args)),
        },
        "DIG" | "DUG" => {
            expect_args(prim, args, "1", 1)?;
            let n = lower_count(prim, &args[0])?;
            if prim == "DIG" {
                Op::Dig(n)
            } else {
                Op::Dug(n)
            }
        }
        "DIP" => match args {
            [body] => Op::Dip(None, lower_body(prim, body)?),
            [n, body] => Op::Dip(Some(lower_count(prim, n)?), lower_body(prim, body)?),
            _ => return Err(arity(prim, "1 or 2", args)),
        },
        "PUSH" => {
            expect_args(prim, args, "2", 2)?;
            Op::Push(lower_type(&args[0])?, args[1].clone())
        }
        "NONE" | "LEFT" | "RIGHT" | "NIL" | "EMPTY_SET" | "CAST" | "UNPACK" | "CONTRACT" => {
            expect_args(prim, args, "1", 1)?;
            let t = lower_type(&args[0])?;
            match prim {
                "NONE" => Op::None(t),
                "LEFT" => Op::Left(t),
                "RIGHT" => Op::Right(t),
                "NIL" => Op::Nil(t),
                "EMPTY_SET" => Op::EmptySet(t),
                "CAST" => Op::Cast(t),
                "UNPACK" => Op::Unpack(t),
                _ => Op::Contract(t),
            }
        }
        "EMPTY_MAP" | "EMPTY_BIG_MAP" => {
            expect_args(prim, args, "2", 2)?;
            let k = lower_type(&args[0])?;
            let v = lower_type(&args[1])?;
            if prim == "EMPTY_MAP" {
                Op::EmptyMap(k, v)
            } else {
                Op::EmptyBigMap(k, v)
            }
        }
        "MAP" | "ITER" | "LOOP" | "LOOP_LEFT" => {
            expect_args(prim, args, "1", 1)?;
            let body = lower_body(prim, &args[0])?;
            match prim {
                "MAP" => Op::Map(body),
                "ITER" => Op::Iter(body),
                "LOOP" => Op::Loop(body),
                _ => Op::LoopLeft(body),
            }
        }
        "IF" | "IF_LEFT" | "IF_NONE" | "IF_CONS" => {
            expect_args(prim, args, "2", 2)?;
            let a = lower_body(prim, &args[0])?;
            let b = lower_body(prim, &args[1])?;
            match prim {
                "IF" => Op::If(a, b),
                "IF_LEFT" => Op::IfLeft(a, b),
                "IF_NONE" => Op::IfNone(a, b),
                _ => Op::IfCons(a, b),
            }
        }
        "LAMBDA" => {
            expect_args(prim, args, "3", 3)?;
            Op::Lambda(
                lower_type(&args[0])?,
                lower_type(&args[1])?,
                lower_body(prim, &args[2])?,
            )
        }
        "CREATE_CONTRACT" => {
            expect_args(prim, args, "1", 1)?;
            Op::CreateContract(args[0].clone())
        }
        _ => return Err(SyntaxError::UnknownInstruction(prim.to_string())),
    };
    Ok(op)
}

fn arity(prim: &str, expected: &'static str, args: &[Node]) -> SyntaxError {
    SyntaxError::Arity {
        prim: prim.to_string(),
        expected,
        found: args.len(),
    }
}

/// Lower a `{ parameter ..; storage ..; code .. }` script. Sections may come
/// in any order; each must appear exactly once.
pub fn lower_script(node: &Node) -> Result<Script, SyntaxError> {
    let Node::Seq(items) = node else {
        return Err(SyntaxError::ExpectedScript(node.kind_name().to_string()));
    };
    let mut parameter = None;
    let mut storage = None;
    let mut code = None;
    for item in items {
        let Some((prim, args)) = item.as_prim() else {
            return Err(SyntaxError::ExpectedScript(item.to_string()));
        };
        let (slot_name, is_code): (&'static str, bool) = match prim {
            "parameter" => ("parameter", false),
            "storage" => ("storage", false),
            "code" => ("code", true),
            other => return Err(SyntaxError::UnknownSection(other.to_string())),
        };
        expect_args(prim, args, "1", 1)?;
        if is_code {
            if code.is_some() {
                return Err(SyntaxError::DuplicateSection(slot_name));
            }
            code = Some(lower_instruction(&args[0])?);
            continue;
        }
        let slot = if slot_name == "parameter" {
            &mut parameter
        } else {
            &mut storage
        };
        if slot.is_some() {
            return Err(SyntaxError::DuplicateSection(slot_name));
        }
        *slot = Some(lower_type(&args[0])?);
    }
    Ok(Script {
        parameter: parameter.ok_or(SyntaxError::MissingSection("parameter"))?,
        storage: storage.ok_or(SyntaxError::MissingSection("storage"))?,
        code: code.ok_or(SyntaxError::MissingSection("code"))?,
    })
}

impl From<&Type> for Node {
    fn from(t: &Type) -> Node {
        Node::Prim {
            prim: t.id().as_str().to_string(),
            args: t.args().into_iter().map(Node::from).collect(),
            annots: t.annots.iter().map(|a| a.as_str().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(v: serde_json::Value) -> Node {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_lower_nested_type() {
        let t = lower_type(&node(json!({
            "prim": "map",
            "args": [{"prim": "string"}, {"prim": "pair", "args": [
                {"prim": "nat", "annots": ["%a"]},
                {"prim": "option", "args": [{"prim": "int"}]}
            ]}]
        })))
        .unwrap();
        assert_eq!(t.id(), TypeId::Map);
        assert_eq!(t.to_string(), "(map string (pair (nat %a) (option int)))");
    }

    #[test]
    fn test_type_arity_enforced() {
        let err = lower_type(&node(json!({"prim": "list"}))).unwrap_err();
        assert!(matches!(err, SyntaxError::Arity { found: 0, .. }));
        let err = lower_type(&node(json!({"prim": "nat", "args": [{"prim": "nat"}]}))).unwrap_err();
        assert!(matches!(err, SyntaxError::Arity { found: 1, .. }));
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(
            lower_type(&node(json!({"prim": "ticket", "args": [{"prim": "nat"}]}))),
            Err(SyntaxError::UnknownType("ticket".into()))
        );
        assert_eq!(
            lower_instruction(&node(json!({"prim": "FROB"}))),
            Err(SyntaxError::UnknownInstruction("FROB".into()))
        );
    }

    #[test]
    fn test_lower_instruction_shapes() {
        let code = lower_instruction(&node(json!([
            {"prim": "DIP", "args": [{"int": "2"}, [{"prim": "DROP"}]]},
            {"prim": "DIG", "args": [{"int": "3"}]},
            {"prim": "PUSH", "args": [{"prim": "nat"}, {"int": "5"}], "annots": ["@five"]},
            {"prim": "IF", "args": [[], [{"prim": "FAILWITH"}]]}
        ])))
        .unwrap();
        assert_eq!(
            code.to_string(),
            "{ DIP 2 { DROP } ; DIG 3 ; PUSH @five nat 5 ; IF {} { FAILWITH } }"
        );
    }

    #[test]
    fn test_reject_bad_arguments() {
        assert!(matches!(
            lower_instruction(&node(json!({"prim": "DIG", "args": [{"int": "-1"}]}))),
            Err(SyntaxError::UnexpectedArg { .. })
        ));
        assert!(matches!(
            lower_instruction(&node(json!({"prim": "IF", "args": [{"prim": "DROP"}, []]}))),
            Err(SyntaxError::UnexpectedArg { .. })
        ));
        assert!(matches!(
            lower_instruction(&node(json!({"prim": "ADD", "args": [{"int": "1"}]}))),
            Err(SyntaxError::Arity { .. })
        ));
        assert!(matches!(
            lower_instruction(&node(json!({"int": "1"}))),
            Err(SyntaxError::ExpectedInstruction(_))
        ));
    }

    #[test]
    fn test_lower_script_sections() {
        let script = lower_script(&node(json!([
            {"prim": "storage", "args": [{"prim": "nat"}]},
            {"prim": "parameter", "args": [{"prim": "unit"}]},
            {"prim": "code", "args": [[{"prim": "CDR"}]]}
        ])))
        .unwrap();
        assert_eq!(script.parameter, Type::unit());
        assert_eq!(script.storage, Type::nat());

        let missing = lower_script(&node(json!([
            {"prim": "parameter", "args": [{"prim": "unit"}]},
            {"prim": "code", "args": [[]]}
        ])));
        assert_eq!(missing, Err(SyntaxError::MissingSection("storage")));

        let dup = lower_script(&node(json!([
            {"prim": "parameter", "args": [{"prim": "unit"}]},
            {"prim": "parameter", "args": [{"prim": "unit"}]}
        ])));
        assert_eq!(dup, Err(SyntaxError::DuplicateSection("parameter")));
    }

    #[test]
    fn test_type_to_node() {
        let src = json!({"prim": "pair", "args": [
            {"prim": "nat", "annots": ["%n"]},
            {"prim": "string"}
        ], "annots": [":p"]});
        let t = lower_type(&node(src.clone())).unwrap();
        assert_eq!(serde_json::to_value(Node::from(&t)).unwrap(), src);
    }
}
