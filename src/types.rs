use std::fmt;

use crate::annot::{AnnotChange, Annotations};

/// Type constructor tag, used for slot pattern matching and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeId {
    Address,
    BigMap,
    Bool,
    Bytes,
    ChainId,
    Contract,
    Int,
    Key,
    KeyHash,
    Lambda,
    List,
    Map,
    Mutez,
    Nat,
    Operation,
    Option,
    Or,
    Pair,
    Set,
    Signature,
    String,
    Timestamp,
    Unit,
}

impl TypeId {
    pub const ALL: [TypeId; 23] = [
        TypeId::Address,
        TypeId::BigMap,
        TypeId::Bool,
        TypeId::Bytes,
        TypeId::ChainId,
        TypeId::Contract,
        TypeId::Int,
        TypeId::Key,
        TypeId::KeyHash,
        TypeId::Lambda,
        TypeId::List,
        TypeId::Map,
        TypeId::Mutez,
        TypeId::Nat,
        TypeId::Operation,
        TypeId::Option,
        TypeId::Or,
        TypeId::Pair,
        TypeId::Set,
        TypeId::Signature,
        TypeId::String,
        TypeId::Timestamp,
        TypeId::Unit,
    ];

    /// Michelson primitive name.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeId::Address => "address",
            TypeId::BigMap => "big_map",
            TypeId::Bool => "bool",
            TypeId::Bytes => "bytes",
            TypeId::ChainId => "chain_id",
            TypeId::Contract => "contract",
            TypeId::Int => "int",
            TypeId::Key => "key",
            TypeId::KeyHash => "key_hash",
            TypeId::Lambda => "lambda",
            TypeId::List => "list",
            TypeId::Map => "map",
            TypeId::Mutez => "mutez",
            TypeId::Nat => "nat",
            TypeId::Operation => "operation",
            TypeId::Option => "option",
            TypeId::Or => "or",
            TypeId::Pair => "pair",
            TypeId::Set => "set",
            TypeId::Signature => "signature",
            TypeId::String => "string",
            TypeId::Timestamp => "timestamp",
            TypeId::Unit => "unit",
        }
    }

    pub fn from_prim(prim: &str) -> Option<TypeId> {
        Self::ALL.iter().copied().find(|id| id.as_str() == prim)
    }

    /// Number of type arguments the constructor takes.
    pub fn arity(self) -> usize {
        match self {
            TypeId::Option | TypeId::List | TypeId::Set | TypeId::Contract => 1,
            TypeId::Pair | TypeId::Or | TypeId::Lambda | TypeId::Map | TypeId::BigMap => 2,
            _ => 0,
        }
    }

    /// Scalar types admitting a total order.
    pub fn is_simple_comparable(self) -> bool {
        matches!(
            self,
            TypeId::Int
                | TypeId::Nat
                | TypeId::String
                | TypeId::Bytes
                | TypeId::Mutez
                | TypeId::Bool
                | TypeId::KeyHash
                | TypeId::Timestamp
                | TypeId::Address
        )
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constructor plus its fixed-arity arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Address,
    Bool,
    Bytes,
    ChainId,
    Int,
    Key,
    KeyHash,
    Mutez,
    Nat,
    Operation,
    Signature,
    String,
    Timestamp,
    Unit,
    Option(Box<Type>),
    List(Box<Type>),
    Set(Box<Type>),
    Contract(Box<Type>),
    Pair(Box<Type>, Box<Type>),
    Or(Box<Type>, Box<Type>),
    Lambda(Box<Type>, Box<Type>),
    Map(Box<Type>, Box<Type>),
    BigMap(Box<Type>, Box<Type>),
}

/// A Michelson type node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    pub kind: TypeKind,
    pub annots: Annotations,
}

macro_rules! nullary {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $name() -> Type {
                Type::new(TypeKind::$kind)
            }
        )*
    };
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            annots: Annotations::new(),
        }
    }

    pub fn with_annots(mut self, annots: Annotations) -> Self {
        self.annots = annots;
        self
    }

    nullary! {
        address => Address,
        bool => Bool,
        bytes => Bytes,
        chain_id => ChainId,
        int => Int,
        key => Key,
        key_hash => KeyHash,
        mutez => Mutez,
        nat => Nat,
        operation => Operation,
        signature => Signature,
        string => String,
        timestamp => Timestamp,
        unit => Unit,
    }

    pub fn option(t: Type) -> Type {
        Type::new(TypeKind::Option(Box::new(t)))
    }

    pub fn list(t: Type) -> Type {
        Type::new(TypeKind::List(Box::new(t)))
    }

    pub fn set(t: Type) -> Type {
        Type::new(TypeKind::Set(Box::new(t)))
    }

    pub fn contract(t: Type) -> Type {
        Type::new(TypeKind::Contract(Box::new(t)))
    }

    pub fn pair(l: Type, r: Type) -> Type {
        Type::new(TypeKind::Pair(Box::new(l), Box::new(r)))
    }

    pub fn or(l: Type, r: Type) -> Type {
        Type::new(TypeKind::Or(Box::new(l), Box::new(r)))
    }

    pub fn lambda(arg: Type, ret: Type) -> Type {
        Type::new(TypeKind::Lambda(Box::new(arg), Box::new(ret)))
    }

    pub fn map(k: Type, v: Type) -> Type {
        Type::new(TypeKind::Map(Box::new(k), Box::new(v)))
    }

    pub fn big_map(k: Type, v: Type) -> Type {
        Type::new(TypeKind::BigMap(Box::new(k), Box::new(v)))
    }

    /// Build from a constructor tag and an argument list of matching arity.
    pub fn from_parts(id: TypeId, args: Vec<Type>) -> Option<Type> {
        if args.len() != id.arity() {
            return None;
        }
        let mut it = args.into_iter().map(Box::new);
        let mut next = || it.next();
        let kind = match id {
            TypeId::Address => TypeKind::Address,
            TypeId::Bool => TypeKind::Bool,
            TypeId::Bytes => TypeKind::Bytes,
            TypeId::ChainId => TypeKind::ChainId,
            TypeId::Int => TypeKind::Int,
            TypeId::Key => TypeKind::Key,
            TypeId::KeyHash => TypeKind::KeyHash,
            TypeId::Mutez => TypeKind::Mutez,
            TypeId::Nat => TypeKind::Nat,
            TypeId::Operation => TypeKind::Operation,
            TypeId::Signature => TypeKind::Signature,
            TypeId::String => TypeKind::String,
            TypeId::Timestamp => TypeKind::Timestamp,
            TypeId::Unit => TypeKind::Unit,
            TypeId::Option => TypeKind::Option(next()?),
            TypeId::List => TypeKind::List(next()?),
            TypeId::Set => TypeKind::Set(next()?),
            TypeId::Contract => TypeKind::Contract(next()?),
            TypeId::Pair => TypeKind::Pair(next()?, next()?),
            TypeId::Or => TypeKind::Or(next()?, next()?),
            TypeId::Lambda => TypeKind::Lambda(next()?, next()?),
            TypeId::Map => TypeKind::Map(next()?, next()?),
            TypeId::BigMap => TypeKind::BigMap(next()?, next()?),
        };
        Some(Type::new(kind))
    }

    pub fn id(&self) -> TypeId {
        match &self.kind {
            TypeKind::Address => TypeId::Address,
            TypeKind::Bool => TypeId::Bool,
            TypeKind::Bytes => TypeId::Bytes,
            TypeKind::ChainId => TypeId::ChainId,
            TypeKind::Int => TypeId::Int,
            TypeKind::Key => TypeId::Key,
            TypeKind::KeyHash => TypeId::KeyHash,
            TypeKind::Mutez => TypeId::Mutez,
            TypeKind::Nat => TypeId::Nat,
            TypeKind::Operation => TypeId::Operation,
            TypeKind::Signature => TypeId::Signature,
            TypeKind::String => TypeId::String,
            TypeKind::Timestamp => TypeId::Timestamp,
            TypeKind::Unit => TypeId::Unit,
            TypeKind::Option(_) => TypeId::Option,
            TypeKind::List(_) => TypeId::List,
            TypeKind::Set(_) => TypeId::Set,
            TypeKind::Contract(_) => TypeId::Contract,
            TypeKind::Pair(..) => TypeId::Pair,
            TypeKind::Or(..) => TypeId::Or,
            TypeKind::Lambda(..) => TypeId::Lambda,
            TypeKind::Map(..) => TypeId::Map,
            TypeKind::BigMap(..) => TypeId::BigMap,
        }
    }

    /// Argument types in slot order.
    pub fn args(&self) -> Vec<&Type> {
        match &self.kind {
            TypeKind::Option(t) | TypeKind::List(t) | TypeKind::Set(t) | TypeKind::Contract(t) => {
                vec![t]
            }
            TypeKind::Pair(a, b)
            | TypeKind::Or(a, b)
            | TypeKind::Lambda(a, b)
            | TypeKind::Map(a, b)
            | TypeKind::BigMap(a, b) => vec![a, b],
            _ => Vec::new(),
        }
    }

    /// Copy of this node with the annotation change applied at the root.
    pub fn annotate(&self, change: &AnnotChange) -> Type {
        Type {
            kind: self.kind.clone(),
            annots: self.annots.apply(change),
        }
    }

    /// Comparable: a simple comparable scalar, or a pair whose first
    /// component is one and whose second component is comparable.
    pub fn is_comparable(&self) -> bool {
        match &self.kind {
            TypeKind::Pair(a, b) => a.id().is_simple_comparable() && b.is_comparable(),
            _ => self.id().is_simple_comparable(),
        }
    }

    /// Packable: values have a canonical byte encoding.
    pub fn is_packable(&self) -> bool {
        match &self.kind {
            TypeKind::Operation | TypeKind::BigMap(..) => false,
            TypeKind::Lambda(..) => true,
            _ => self.args().iter().all(|t| t.is_packable()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args();
        if args.is_empty() && self.annots.is_empty() {
            return f.write_str(self.id().as_str());
        }
        write!(f, "({}", self.id())?;
        if !self.annots.is_empty() {
            write!(f, " {}", self.annots)?;
        }
        for a in args {
            write!(f, " {}", a)?;
        }
        f.write_str(")")
    }
}

/// Render a stack top-first as `[a, b, c]`.
pub fn display_stack(stack: &[Type]) -> String {
    let parts: Vec<String> = stack.iter().map(|t| t.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
