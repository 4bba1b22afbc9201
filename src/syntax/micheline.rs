//! Micheline: the generic tree every Michelson type, literal and program is
//! written in. This is the shape an external parser hands over, in its JSON
//! interchange form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One Micheline node. Data literals are plain nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Int {
        int: String,
    },
    String {
        string: String,
    },
    Bytes {
        bytes: String,
    },
    Prim {
        prim: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Node>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        annots: Vec<String>,
    },
    Seq(Vec<Node>),
}

impl Node {
    pub fn int(v: impl fmt::Display) -> Node {
        Node::Int { int: v.to_string() }
    }

    pub fn string(s: impl Into<String>) -> Node {
        Node::String { string: s.into() }
    }

    pub fn bytes(hex: impl Into<String>) -> Node {
        Node::Bytes { bytes: hex.into() }
    }

    pub fn prim(name: impl Into<String>, args: Vec<Node>) -> Node {
        Node::Prim {
            prim: name.into(),
            args,
            annots: Vec::new(),
        }
    }

    pub fn prim_annot(name: impl Into<String>, args: Vec<Node>, annots: &[&str]) -> Node {
        Node::Prim {
            prim: name.into(),
            args,
            annots: annots.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn seq(items: Vec<Node>) -> Node {
        Node::Seq(items)
    }

    /// The primitive name and arguments, if this is an application.
    pub fn as_prim(&self) -> Option<(&str, &[Node])> {
        match self {
            Node::Prim { prim, args, .. } => Some((prim, args)),
            _ => None,
        }
    }

    /// Short label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Int { .. } => "int",
            Node::String { .. } => "string",
            Node::Bytes { .. } => "bytes",
            Node::Prim { .. } => "prim",
            Node::Seq(_) => "sequence",
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Hex digits of a bytes literal, with at most one `0x` prefix removed.
pub fn hex_digits(bytes: &str) -> &str {
    bytes.strip_prefix("0x").unwrap_or(bytes)
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Int { int } => f.write_str(int),
            Node::String { string } => write_escaped(f, string),
            Node::Bytes { bytes } => write!(f, "0x{}", hex_digits(bytes)),
            Node::Prim { prim, args, annots } => {
                if args.is_empty() && annots.is_empty() {
                    return f.write_str(prim);
                }
                write!(f, "({}", prim)?;
                for a in annots {
                    write!(f, " {}", a)?;
                }
                for a in args {
                    write!(f, " {}", a)?;
                }
                f.write_str(")")
            }
            Node::Seq(items) => {
                if items.is_empty() {
                    return f.write_str("{}");
                }
                let parts: Vec<String> = items.iter().map(|n| n.to_string()).collect();
                write!(f, "{{ {} }}", parts.join(" ; "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_shapes() {
        let node: Node = serde_json::from_str(
            r#"[{"int":"-3"},{"string":"a"},{"bytes":"00ff"},
                {"prim":"Pair","args":[{"int":"1"},{"prim":"Unit"}]},
                {"prim":"nat","annots":[":n"]}]"#,
        )
        .unwrap();
        let Node::Seq(items) = node else {
            panic!("expected a sequence");
        };
        assert_eq!(items[0], Node::int(-3));
        assert_eq!(items[1], Node::string("a"));
        assert_eq!(items[2], Node::bytes("00ff"));
        assert_eq!(
            items[3],
            Node::prim("Pair", vec![Node::int(1), Node::prim("Unit", vec![])])
        );
        assert_eq!(items[4], Node::prim_annot("nat", vec![], &[":n"]));
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let json = serde_json::to_string(&Node::prim("Unit", vec![])).unwrap();
        assert_eq!(json, r#"{"prim":"Unit"}"#);
    }

    #[test]
    fn test_display() {
        let n = Node::seq(vec![
            Node::prim("Elt", vec![Node::string("k\""), Node::bytes("0a")]),
            Node::prim_annot("nat", vec![], &[":t"]),
        ]);
        assert_eq!(n.to_string(), r#"{ (Elt "k\"" 0x0a) ; (nat :t) }"#);
    }
}
