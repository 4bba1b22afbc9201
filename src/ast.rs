pub mod display;

use crate::annot::Annotations;
use crate::syntax::micheline::Node;
use crate::types::Type;

/// A Michelson instruction or a `{ ... }` sequence of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Seq(Vec<Instruction>),
    Instr(Instr),
}

impl Instruction {
    pub fn op(op: Op) -> Self {
        Instruction::Instr(Instr::new(op))
    }

    pub fn seq(items: Vec<Instruction>) -> Self {
        Instruction::Seq(items)
    }
}

impl From<Instr> for Instruction {
    fn from(i: Instr) -> Self {
        Instruction::Instr(i)
    }
}

/// One opcode together with its own annotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instr {
    pub op: Op,
    pub annots: Annotations,
}

impl Instr {
    pub fn new(op: Op) -> Self {
        Self {
            op,
            annots: Annotations::new(),
        }
    }

    pub fn with_annots(mut self, annots: Annotations) -> Self {
        self.annots = annots;
        self
    }
}

/// Instruction body: always written as a sequence.
pub type Body = Vec<Instruction>;

/// The closed opcode set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    // Stack manipulation
    Drop(Option<usize>),
    Dup,
    Swap,
    Dig(usize),
    Dug(usize),
    Dip(Option<usize>, Body),
    Push(Type, Node),
    Rename,

    // Constructors and destructors
    Unit,
    Some,
    None(Type),
    Left(Type),
    Right(Type),
    Nil(Type),
    Pair,
    Car,
    Cdr,
    Cons,
    EmptySet(Type),
    EmptyMap(Type, Type),
    EmptyBigMap(Type, Type),

    // Containers
    Size,
    Mem,
    Get,
    Update,
    Map(Body),
    Iter(Body),
    Concat,
    Slice,

    // Control
    If(Body, Body),
    IfLeft(Body, Body),
    IfNone(Body, Body),
    IfCons(Body, Body),
    Loop(Body),
    LoopLeft(Body),
    Lambda(Type, Type, Body),
    Exec,
    Apply,
    Failwith,
    Cast(Type),

    // Serialization
    Pack,
    Unpack(Type),

    // Arithmetic and logic
    Add,
    Sub,
    Mul,
    Ediv,
    Abs,
    IsNat,
    Int,
    Neg,
    Lsl,
    Lsr,
    Or,
    Xor,
    And,
    Not,
    Compare,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,

    // Chain environment
    Self_,
    Contract(Type),
    TransferTokens,
    SetDelegate,
    CreateAccount,
    CreateContract(Node),
    ImplicitAccount,
    Now,
    Amount,
    Balance,
    CheckSignature,
    Blake2b,
    Sha256,
    Sha512,
    HashKey,
    StepsToQuota,
    Source,
    Sender,
    Address,
    ChainId,
}

impl Op {
    /// Michelson primitive name.
    pub fn prim(&self) -> &'static str {
        match self {
            Op::Drop(_) => "DROP",
            Op::Dup => "DUP",
            Op::Swap => "SWAP",
            Op::Dig(_) => "DIG",
            Op::Dug(_) => "DUG",
            Op::Dip(..) => "DIP",
            Op::Push(..) => "PUSH",
            Op::Rename => "RENAME",
            Op::Unit => "UNIT",
            Op::Some => "SOME",
            Op::None(_) => "NONE",
            Op::Left(_) => "LEFT",
            Op::Right(_) => "RIGHT",
            Op::Nil(_) => "NIL",
            Op::Pair => "PAIR",
            Op::Car => "CAR",
            Op::Cdr => "CDR",
            Op::Cons => "CONS",
            Op::EmptySet(_) => "EMPTY_SET",
            Op::EmptyMap(..) => "EMPTY_MAP",
            Op::EmptyBigMap(..) => "EMPTY_BIG_MAP",
            Op::Size => "SIZE",
            Op::Mem => "MEM",
            Op::Get => "GET",
            Op::Update => "UPDATE",
            Op::Map(_) => "MAP",
            Op::Iter(_) => "ITER",
            Op::Concat => "CONCAT",
            Op::Slice => "SLICE",
            Op::If(..) => "IF",
            Op::IfLeft(..) => "IF_LEFT",
            Op::IfNone(..) => "IF_NONE",
            Op::IfCons(..) => "IF_CONS",
            Op::Loop(_) => "LOOP",
            Op::LoopLeft(_) => "LOOP_LEFT",
            Op::Lambda(..) => "LAMBDA",
            Op::Exec => "EXEC",
            Op::Apply => "APPLY",
            Op::Failwith => "FAILWITH",
            Op::Cast(_) => "CAST",
            Op::Pack => "PACK",
            Op::Unpack(_) => "UNPACK",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Ediv => "EDIV",
            Op::Abs => "ABS",
            Op::IsNat => "ISNAT",
            Op::Int => "INT",
            Op::Neg => "NEG",
            Op::Lsl => "LSL",
            Op::Lsr => "LSR",
            Op::Or => "OR",
            Op::Xor => "XOR",
            Op::And => "AND",
            Op::Not => "NOT",
            Op::Compare => "COMPARE",
            Op::Eq => "EQ",
            Op::Neq => "NEQ",
            Op::Lt => "LT",
            Op::Gt => "GT",
            Op::Le => "LE",
            Op::Ge => "GE",
            Op::Self_ => "SELF",
            Op::Contract(_) => "CONTRACT",
            Op::TransferTokens => "TRANSFER_TOKENS",
            Op::SetDelegate => "SET_DELEGATE",
            Op::CreateAccount => "CREATE_ACCOUNT",
            Op::CreateContract(_) => "CREATE_CONTRACT",
            Op::ImplicitAccount => "IMPLICIT_ACCOUNT",
            Op::Now => "NOW",
            Op::Amount => "AMOUNT",
            Op::Balance => "BALANCE",
            Op::CheckSignature => "CHECK_SIGNATURE",
            Op::Blake2b => "BLAKE2B",
            Op::Sha256 => "SHA256",
            Op::Sha512 => "SHA512",
            Op::HashKey => "HASH_KEY",
            Op::StepsToQuota => "STEPS_TO_QUOTA",
            Op::Source => "SOURCE",
            Op::Sender => "SENDER",
            Op::Address => "ADDRESS",
            Op::ChainId => "CHAIN_ID",
        }
    }

    /// Opcodes without arguments, by primitive name.
    pub fn nullary(prim: &str) -> Option<Op> {
        let op = match prim {
            "DUP" => Op::Dup,
            "SWAP" => Op::Swap,
            "RENAME" => Op::Rename,
            "UNIT" => Op::Unit,
            "SOME" => Op::Some,
            "PAIR" => Op::Pair,
            "CAR" => Op::Car,
            "CDR" => Op::Cdr,
            "CONS" => Op::Cons,
            "SIZE" => Op::Size,
            "MEM" => Op::Mem,
            "GET" => Op::Get,
            "UPDATE" => Op::Update,
            "CONCAT" => Op::Concat,
            "SLICE" => Op::Slice,
            "EXEC" => Op::Exec,
            "APPLY" => Op::Apply,
            "FAILWITH" => Op::Failwith,
            "PACK" => Op::Pack,
            "ADD" => Op::Add,
            "SUB" => Op::Sub,
            "MUL" => Op::Mul,
            "EDIV" => Op::Ediv,
            "ABS" => Op::Abs,
            "ISNAT" => Op::IsNat,
            "INT" => Op::Int,
            "NEG" => Op::Neg,
            "LSL" => Op::Lsl,
            "LSR" => Op::Lsr,
            "OR" => Op::Or,
            "XOR" => Op::Xor,
            "AND" => Op::And,
            "NOT" => Op::Not,
            "COMPARE" => Op::Compare,
            "EQ" => Op::Eq,
            "NEQ" => Op::Neq,
            "LT" => Op::Lt,
            "GT" => Op::Gt,
            "LE" => Op::Le,
            "GE" => Op::Ge,
            "SELF" => Op::Self_,
            "TRANSFER_TOKENS" => Op::TransferTokens,
            "SET_DELEGATE" => Op::SetDelegate,
            "CREATE_ACCOUNT" => Op::CreateAccount,
            "IMPLICIT_ACCOUNT" => Op::ImplicitAccount,
            "NOW" => Op::Now,
            "AMOUNT" => Op::Amount,
            "BALANCE" => Op::Balance,
            "CHECK_SIGNATURE" => Op::CheckSignature,
            "BLAKE2B" => Op::Blake2b,
            "SHA256" => Op::Sha256,
            "SHA512" => Op::Sha512,
            "HASH_KEY" => Op::HashKey,
            "STEPS_TO_QUOTA" => Op::StepsToQuota,
            "SOURCE" => Op::Source,
            "SENDER" => Op::Sender,
            "ADDRESS" => Op::Address,
            "CHAIN_ID" => Op::ChainId,
            _ => return None,
        };
        Some(op)
    }
}

/// A complete contract: parameter type, storage type and code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    pub parameter: Type,
    pub storage: Type,
    pub code: Instruction,
}
