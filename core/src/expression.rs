//! Parsed, ready-to-evaluate formulas.

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::ast::Node;
use crate::context::{EvaluationContext, Limits, NoVariables, VariableSource};
use crate::errors::Error;
use crate::parser;
use crate::timeout::{DEFAULT_TIMEOUT, TimeoutManager};

/// Options for a single evaluation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    /// Deadline for the whole call.
    ///
    /// Default: 5 seconds
    pub timeout: Duration,

    pub limits: Limits,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            limits: Limits::default(),
        }
    }
}

/// A parsed formula.
///
/// The tree is immutable and shared, so cloning is cheap and one expression
/// may be evaluated from several threads at once. Every evaluation call
/// builds its own [`EvaluationContext`].
#[derive(Debug, Clone)]
pub struct Expression {
    source: Arc<str>,
    root: Arc<Node>,
    limits: Limits,
}

impl Expression {
    pub(crate) fn new(source: &str, root: Node, limits: Limits) -> Self {
        Self {
            source: source.into(),
            root: Arc::new(root),
            limits,
        }
    }

    /// Parse with default options. Shorthand for [`parser::parse`].
    pub fn parse(source: &str) -> Result<Self, Error> {
        parser::parse(source)
    }

    /// The text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Limits used by the evaluation entry points that take none.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Whether the expression evaluates without any variable bindings.
    pub fn is_constant(&self) -> bool {
        self.root.is_constant()
    }

    /// Render as text. See [`Node::render`].
    pub fn render(&self, reduce: bool) -> String {
        self.root.render(reduce)
    }

    /// Evaluate with no variables and the default timeout.
    pub fn evaluate(&self) -> Result<f64, Error> {
        self.evaluate_with(&NoVariables)
    }

    /// Evaluate against `variables` with the default timeout.
    pub fn evaluate_with(&self, variables: &dyn VariableSource) -> Result<f64, Error> {
        self.evaluate_in(variables, &TimeoutManager::default(), self.limits)
    }

    /// Evaluate against `variables` and an existing deadline.
    pub fn evaluate_with_timeout(
        &self,
        variables: &dyn VariableSource,
        timeout: &TimeoutManager,
    ) -> Result<f64, Error> {
        self.evaluate_in(variables, timeout, self.limits)
    }

    /// Evaluate with every knob supplied explicitly.
    ///
    /// The limits apply to the tree as parsed. Subtrees folded at parse time
    /// were already checked against the parser's limits and are not run
    /// again.
    pub fn evaluate_with_limits(
        &self,
        variables: &dyn VariableSource,
        timeout: &TimeoutManager,
        max_recursive_substitutions: usize,
        max_summation_iterations: usize,
    ) -> Result<f64, Error> {
        let limits = Limits::new(max_recursive_substitutions, max_summation_iterations).validate()?;
        self.evaluate_in(variables, timeout, limits)
    }

    /// Like [`evaluate_with_limits`](Self::evaluate_with_limits), with the
    /// deadline and limits bundled in `options`.
    pub fn evaluate_with_options(
        &self,
        variables: &dyn VariableSource,
        options: &EvaluationOptions,
    ) -> Result<f64, Error> {
        let limits = options.limits.validate()?;
        self.evaluate_in(variables, &TimeoutManager::new(options.timeout), limits)
    }

    /// Evaluate inside a context owned by the caller.
    ///
    /// Used when this expression is the value of a variable in another
    /// evaluation, so counters and deadline carry over.
    pub fn evaluate_in_context(&self, ctx: &mut EvaluationContext<'_>) -> Result<f64, Error> {
        self.root.evaluate(ctx)
    }

    fn evaluate_in(
        &self,
        variables: &dyn VariableSource,
        timeout: &TimeoutManager,
        limits: Limits,
    ) -> Result<f64, Error> {
        tracing::debug!(source = %self.source, "evaluating formula");
        let mut ctx = EvaluationContext::new(variables, timeout, limits);
        let result = self.root.evaluate(&mut ctx);
        if let Err(err) = &result {
            tracing::debug!(source = %self.source, error = %err, "evaluation failed");
        }
        result
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}
