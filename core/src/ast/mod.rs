//! Abstract syntax tree for formulas.
//!
//! Nodes are immutable once the parser has built (and possibly folded) them.
//! Evaluation lives in `eval`, rendering in `display`, and the per-operator
//! arithmetic in `ops`.

mod display;
mod eval;
mod ops;


pub use ops::{BinaryOp, ComparisonOp, LogicOp, NullaryOp, TrinaryOp, UnaryOp};

use ecow::EcoString;

/// Name of the loop index bound by `sum(from, to, body)`.
pub const SUMMATION_INDEX: &str = "n";

/// One operator or operand of a parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal as written.
    Number(f64),

    /// Precomputed value with a display label: a named constant such as `pi`,
    /// or a folded subtree labelled with its original rendering.
    Constant { value: f64, label: EcoString },

    /// Named variable resolved through the evaluation context.
    Variable {
        name: EcoString,
        /// Built inside the arguments of a summation, where `n` is bound.
        in_summation: bool,
    },

    Nullary(NullaryOp),

    Unary { op: UnaryOp, arg: Box<Node> },

    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    Comparison {
        op: ComparisonOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    Logic {
        op: LogicOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    Trinary {
        op: TrinaryOp,
        first: Box<Node>,
        second: Box<Node>,
        third: Box<Node>,
    },

    /// `sum(from, to, body)` over the inclusive integer steps from `from`.
    Summation {
        from: Box<Node>,
        to: Box<Node>,
        body: Box<Node>,
    },

    /// Top-level wrapper rejecting non-finite results.
    Finite(Box<Node>),
}

impl Node {
    /// Whether this node evaluates without any variable bindings and without
    /// side effects.
    ///
    /// The summation index `n` counts as constant when it was parsed inside a
    /// summation, since every iteration binds it.
    pub fn is_constant(&self) -> bool {
        // Walked with an explicit stack: a long `x + x + ...` chain is as
        // deep as it is wide.
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Node::Number(_) | Node::Constant { .. } => {}
                Node::Variable { name, in_summation } => {
                    if !(*in_summation && name.as_str() == SUMMATION_INDEX) {
                        return false;
                    }
                }
                Node::Nullary(_) => return false,
                Node::Unary { arg, .. } | Node::Finite(arg) => pending.push(arg),
                Node::Binary { left, right, .. }
                | Node::Comparison { left, right, .. }
                | Node::Logic { left, right, .. } => {
                    pending.push(left);
                    pending.push(right);
                }
                Node::Trinary {
                    first,
                    second,
                    third,
                    ..
                }
                | Node::Summation {
                    from: first,
                    to: second,
                    body: third,
                } => {
                    pending.push(first);
                    pending.push(second);
                    pending.push(third);
                }
            }
        }
        true
    }

    fn has_children(&self) -> bool {
        !matches!(
            self,
            Node::Number(_) | Node::Constant { .. } | Node::Variable { .. } | Node::Nullary(_)
        )
    }

    /// Move every child that has children of its own into `pending`, leaving
    /// a leaf in its place.
    fn detach_children(&mut self, pending: &mut Vec<Box<Node>>) {
        let mut detach = |child: &mut Box<Node>| {
            if child.has_children() {
                pending.push(core::mem::replace(child, Box::new(Node::Number(0.0))));
            }
        };
        match self {
            Node::Number(_) | Node::Constant { .. } | Node::Variable { .. } | Node::Nullary(_) => {}
            Node::Unary { arg, .. } | Node::Finite(arg) => detach(arg),
            Node::Binary { left, right, .. }
            | Node::Comparison { left, right, .. }
            | Node::Logic { left, right, .. } => {
                detach(left);
                detach(right);
            }
            Node::Trinary {
                first,
                second,
                third,
                ..
            }
            | Node::Summation {
                from: first,
                to: second,
                body: third,
            } => {
                detach(first);
                detach(second);
                detach(third);
            }
        }
    }

    /// Whether the node is already a literal and cannot be folded further.
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Number(_) | Node::Constant { .. })
    }

    /// Look up a named constant (`pi`, `e`, `true`, `false`).
    pub fn named_constant(name: &str) -> Option<Node> {
        let value = match name {
            "pi" => core::f64::consts::PI,
            "e" => core::f64::consts::E,
            "true" => crate::numeric::TRUE,
            "false" => crate::numeric::FALSE,
            _ => return None,
        };
        Some(Node::Constant {
            value,
            label: name.into(),
        })
    }

    /// Build a constant labelled with this node's unreduced rendering.
    pub(crate) fn into_folded(self, value: f64) -> Node {
        Node::Constant {
            value,
            label: self.render(false).into(),
        }
    }
}

// The derived drop glue would recurse once per level of nesting.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}
