//! Tree-walking evaluation.

use crate::ast::Node;
use crate::context::EvaluationContext;
use crate::errors::{Error, EvaluationError};
use crate::numeric::{check_finite, from_bool, to_bool};
use crate::stack::ensure_sufficient_stack;

impl Node {
    /// Evaluate this node.
    ///
    /// Left operands are always evaluated before right operands. Every node
    /// that can recurse checks the deadline first.
    pub fn evaluate(&self, ctx: &mut EvaluationContext<'_>) -> Result<f64, Error> {
        match self {
            Node::Number(value) | Node::Constant { value, .. } => Ok(*value),
            Node::Nullary(op) => Ok(op.apply()),
            _ => {
                ctx.check_timeout()?;
                ensure_sufficient_stack(|| self.evaluate_inner(ctx))
            }
        }
    }

    fn evaluate_inner(&self, ctx: &mut EvaluationContext<'_>) -> Result<f64, Error> {
        match self {
            Node::Number(value) | Node::Constant { value, .. } => Ok(*value),

            Node::Nullary(op) => Ok(op.apply()),

            Node::Variable { name, .. } => ctx.resolve_variable(name),

            Node::Unary { op, arg } => {
                let value = arg.evaluate(ctx)?;
                check_finite(op.apply(value))
            }

            Node::Binary { op, left, right } => {
                let left = left.evaluate(ctx)?;
                let right = right.evaluate(ctx)?;
                check_finite(op.apply(left, right)?)
            }

            Node::Comparison { op, left, right } => {
                let left = left.evaluate(ctx)?;
                let right = right.evaluate(ctx)?;
                Ok(from_bool(op.test(left, right)))
            }

            Node::Logic { op, left, right } => {
                let left = to_bool(left.evaluate(ctx)?)?;
                let right = to_bool(right.evaluate(ctx)?)?;
                Ok(from_bool(op.apply(left, right)))
            }

            Node::Trinary {
                first,
                second,
                third,
                ..
            } => {
                // `if` is the only trinary function; only the taken branch runs.
                if to_bool(first.evaluate(ctx)?)? {
                    second.evaluate(ctx)
                } else {
                    third.evaluate(ctx)
                }
            }

            Node::Summation { from, to, body } => {
                let from = from.evaluate(ctx)?;
                let to = to.evaluate(ctx)?;
                evaluate_summation(from, to, body, ctx)
            }

            Node::Finite(inner) => check_finite(inner.evaluate(ctx)?),
        }
    }
}

/// Sum `body` over `from, from + 1, ...` up to and including `to`.
fn evaluate_summation(
    from: f64,
    to: f64,
    body: &Node,
    ctx: &mut EvaluationContext<'_>,
) -> Result<f64, Error> {
    if to < from {
        return Err(EvaluationError::SummationBounds { from, to }.into());
    }

    let length = (to - from).floor() + 1.0;
    let limit = ctx.limits().max_summation_iterations;
    if limit > 0 && length > limit as f64 {
        return Err(EvaluationError::SummationTooLong { length, limit }.into());
    }

    tracing::trace!(from, to, length, "evaluating summation");

    let mut sum = 0.0;
    let mut step: u64 = 0;
    loop {
        let index = from + step as f64;
        if index > to {
            break;
        }
        ctx.check_timeout()?;
        let mut scope = ctx.summation_scope(index);
        sum += body.evaluate(&mut scope)?;
        step += 1;
    }
    check_finite(sum)
}
