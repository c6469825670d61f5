//! Constant folding applied while the tree is being built.

use crate::ast::Node;
use crate::context::{EvaluationContext, Limits, NoVariables};
use crate::errors::Error;
use crate::timeout::TimeoutManager;

/// Replace a constant `node` by its precomputed value.
///
/// The caller has already established that `node` needs no bindings. A
/// failed speculative evaluation keeps the node as it is, so errors such as
/// a division by zero surface when the expression is evaluated rather than
/// when it is parsed. A timeout is the exception and aborts the parse.
pub(crate) fn fold(node: Node, timeout: &TimeoutManager, limits: Limits) -> Result<Node, Error> {
    if node.is_literal() {
        return Ok(node);
    }

    let mut ctx = EvaluationContext::new(&NoVariables, timeout, limits);
    match node.evaluate(&mut ctx) {
        Ok(value) => {
            let folded = node.into_folded(value);
            tracing::debug!(%folded, value, "folded constant subtree");
            Ok(folded)
        }
        Err(err @ Error::Timeout(_)) => Err(err),
        Err(err) => {
            tracing::debug!(%node, error = %err, "left subtree unreduced");
            Ok(node)
        }
    }
}
