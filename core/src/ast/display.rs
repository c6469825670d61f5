//! Rendering nodes back to formula text.
//!
//! The unreduced form reproduces the surface syntax: parentheses survive as
//! `Paren` nodes and folded constants print their original label, so the
//! output re-parses to an equivalent tree. The reduced form prints folded
//! values instead and is meant for diagnostics only.

use core::fmt::{self, Write};

use crate::ast::{Node, UnaryOp};
use crate::stack::ensure_sufficient_stack;

impl Node {
    /// Render as text. With `reduce` set, folded constants print as numbers.
    pub fn render(&self, reduce: bool) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_to(&mut out, reduce);
        out
    }

    fn write_to(&self, out: &mut String, reduce: bool) -> fmt::Result {
        ensure_sufficient_stack(|| self.write_node(out, reduce))
    }

    fn write_node(&self, out: &mut String, reduce: bool) -> fmt::Result {
        match self {
            Node::Number(value) => write_number(out, *value),

            Node::Constant { value, label } => {
                if reduce {
                    // Keep negative values atomic when embedded in operators.
                    if *value < 0.0 {
                        out.push('(');
                        write_number(out, *value)?;
                        out.push(')');
                        Ok(())
                    } else {
                        write_number(out, *value)
                    }
                } else {
                    out.write_str(label)
                }
            }

            Node::Variable { name, .. } => out.write_str(name),

            Node::Nullary(op) => write!(out, "{}()", op.name()),

            Node::Unary { op, arg } => match op {
                UnaryOp::Neg => {
                    out.push('-');
                    arg.write_to(out, reduce)
                }
                UnaryOp::Paren => {
                    out.push('(');
                    arg.write_to(out, reduce)?;
                    out.push(')');
                    Ok(())
                }
                _ => {
                    out.write_str(op.function_name().unwrap_or_default())?;
                    out.push('(');
                    arg.write_to(out, reduce)?;
                    out.push(')');
                    Ok(())
                }
            },

            Node::Binary { op, left, right } => match op.symbol() {
                Some(symbol) => write_infix(out, left, symbol, right, reduce),
                None => write_call(
                    out,
                    op.function_name().unwrap_or_default(),
                    &[left, right],
                    reduce,
                ),
            },

            Node::Comparison { op, left, right } => {
                write_infix(out, left, op.symbol(), right, reduce)
            }

            Node::Logic { op, left, right } => write_infix(out, left, op.symbol(), right, reduce),

            Node::Trinary {
                op,
                first,
                second,
                third,
            } => write_call(out, op.name(), &[first, second, third], reduce),

            Node::Summation { from, to, body } => write_call(out, "sum", &[from, to, body], reduce),

            Node::Finite(inner) => match inner.as_ref() {
                // A bare top-level value needs no protective parentheses.
                Node::Constant { value, .. } if reduce => write_number(out, *value),
                _ => inner.write_to(out, reduce),
            },
        }
    }
}

fn write_number(out: &mut String, value: f64) -> fmt::Result {
    write!(out, "{value}")
}

fn write_infix(out: &mut String, left: &Node, symbol: &str, right: &Node, reduce: bool) -> fmt::Result {
    left.write_to(out, reduce)?;
    write!(out, " {symbol} ")?;
    right.write_to(out, reduce)
}

fn write_call(out: &mut String, name: &str, args: &[&Box<Node>], reduce: bool) -> fmt::Result {
    out.write_str(name)?;
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        arg.write_to(out, reduce)?;
    }
    out.push(')');
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
