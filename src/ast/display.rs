//! Michelson text rendering for instructions, used in diagnostics.

use std::fmt;

use super::{Instr, Instruction, Op};

fn write_body(f: &mut fmt::Formatter<'_>, body: &[Instruction]) -> fmt::Result {
    if body.is_empty() {
        return f.write_str(" {}");
    }
    let parts: Vec<String> = body.iter().map(|i| i.to_string()).collect();
    write!(f, " {{ {} }}", parts.join(" ; "))
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Seq(items) => {
                if items.is_empty() {
                    return f.write_str("{}");
                }
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "{{ {} }}", parts.join(" ; "))
            }
            Instruction::Instr(i) => fmt::Display::fmt(i, f),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.prim())?;
        if !self.annots.is_empty() {
            write!(f, " {}", self.annots)?;
        }
        match &self.op {
            Op::Drop(Some(n)) | Op::Dig(n) | Op::Dug(n) => write!(f, " {}", n),
            Op::Dip(n, body) => {
                if let Some(n) = n {
                    write!(f, " {}", n)?;
                }
                write_body(f, body)
            }
            Op::Push(t, d) => write!(f, " {} {}", t, d),
            Op::None(t)
            | Op::Left(t)
            | Op::Right(t)
            | Op::Nil(t)
            | Op::EmptySet(t)
            | Op::Cast(t)
            | Op::Unpack(t)
            | Op::Contract(t) => write!(f, " {}", t),
            Op::EmptyMap(k, v) | Op::EmptyBigMap(k, v) => write!(f, " {} {}", k, v),
            Op::Map(b) | Op::Iter(b) | Op::Loop(b) | Op::LoopLeft(b) => write_body(f, b),
            Op::If(a, b) | Op::IfLeft(a, b) | Op::IfNone(a, b) | Op::IfCons(a, b) => {
                write_body(f, a)?;
                write_body(f, b)
            }
            Op::Lambda(a, r, b) => {
                write!(f, " {} {}", a, r)?;
                write_body(f, b)
            }
            Op::CreateContract(n) => write!(f, " {}", n),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::micheline::Node;
    use crate::types::Type;

    #[test]
    fn test_format_nested() {
        let code = Instruction::seq(vec![
            Instruction::op(Op::Push(Type::nat(), Node::int(1))),
            Instruction::op(Op::If(vec![Instruction::op(Op::Drop(None))], vec![])),
            Instruction::op(Op::Dip(Some(2), vec![Instruction::op(Op::Swap)])),
        ]);
        assert_eq!(
            code.to_string(),
            "{ PUSH nat 1 ; IF { DROP } {} ; DIP 2 { SWAP } }"
        );
    }

    #[test]
    fn test_format_lambda() {
        let l = Instruction::op(Op::Lambda(Type::nat(), Type::int(), vec![Instruction::op(Op::Int)]));
        assert_eq!(l.to_string(), "LAMBDA nat int { INT }");
    }
}
