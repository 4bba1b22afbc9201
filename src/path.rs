//! Breadcrumbs from the root of a checked tree to the node being examined.
//!
//! A `Path` lives on the call stack: every recursive step pushes a child
//! frame that borrows its parent, so nothing is allocated until an error
//! materializes the trail as a list of [`PathStep`]s.

use std::fmt;

use serde::Serialize;

use crate::ast::Instruction;
use crate::syntax::micheline::Node;
use crate::types::Type;

/// The node a step descended into.
#[derive(Clone, Copy, Debug)]
pub enum Crumb<'a> {
    Type(&'a Type),
    Data(&'a Node),
    Instr(&'a Instruction),
    Body(&'a [Instruction]),
}

impl Crumb<'_> {
    fn render(&self) -> String {
        match self {
            Crumb::Type(t) => t.to_string(),
            Crumb::Data(d) => d.to_string(),
            Crumb::Instr(i) => i.to_string(),
            Crumb::Body(b) => Instruction::Seq(b.to_vec()).to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Path<'a> {
    parent: Option<&'a Path<'a>>,
    step: Option<(usize, Crumb<'a>)>,
    depth: usize,
}

impl Default for Path<'_> {
    fn default() -> Self {
        Self::root()
    }
}

impl<'a> Path<'a> {
    pub fn root() -> Self {
        Self {
            parent: None,
            step: None,
            depth: 0,
        }
    }

    /// Child path one level below `self`.
    pub fn push<'b>(&'b self, index: usize, crumb: Crumb<'b>) -> Path<'b> {
        Path {
            parent: Some(self),
            step: Some((index, crumb)),
            depth: self.depth + 1,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Materialize root-first.
    pub fn steps(&self) -> Vec<PathStep> {
        let mut out = Vec::with_capacity(self.depth);
        let mut cur = Some(self);
        while let Some(p) = cur {
            if let Some((index, crumb)) = &p.step {
                out.push(PathStep {
                    index: *index,
                    node: crumb.render(),
                });
            }
            cur = p.parent;
        }
        out.reverse();
        out
    }
}

/// One materialized breadcrumb: child index plus a rendering of the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub index: usize,
    pub node: String,
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.node)
    }
}
