//! State threaded through one top-level evaluation.

use ecow::EcoString;
use hashbrown::HashMap;

use crate::ast::SUMMATION_INDEX;
use crate::errors::{Error, EvaluationError};
use crate::timeout::TimeoutManager;

/// Default cap on how often one variable may be resolved in a single call.
pub const DEFAULT_MAX_RECURSIVE_SUBSTITUTIONS: usize = 1000;

/// Default cap on summation loop length.
pub const DEFAULT_MAX_SUMMATION_ITERATIONS: usize = 100_000;

/// Accepted range for [`Limits::max_recursive_substitutions`].
pub const RECURSIVE_SUBSTITUTIONS_RANGE: core::ops::RangeInclusive<usize> = 2..=1000;

/// Resource limits applied while evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// How many times a single variable may be resolved before it is treated
    /// as recursive. Must lie in `2..=1000`.
    pub max_recursive_substitutions: usize,

    /// Longest allowed summation loop. `0` disables the cap.
    pub max_summation_iterations: usize,
}

impl Limits {
    pub fn new(max_recursive_substitutions: usize, max_summation_iterations: usize) -> Self {
        Self {
            max_recursive_substitutions,
            max_summation_iterations,
        }
    }

    pub fn validate(self) -> Result<Self, Error> {
        if !RECURSIVE_SUBSTITUTIONS_RANGE.contains(&self.max_recursive_substitutions) {
            return Err(Error::InvalidOption(format!(
                "max_recursive_substitutions must be between {} and {}, got {}",
                RECURSIVE_SUBSTITUTIONS_RANGE.start(),
                RECURSIVE_SUBSTITUTIONS_RANGE.end(),
                self.max_recursive_substitutions
            )));
        }
        Ok(self)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_recursive_substitutions: DEFAULT_MAX_RECURSIVE_SUBSTITUTIONS,
            max_summation_iterations: DEFAULT_MAX_SUMMATION_ITERATIONS,
        }
    }
}

/// Something that can supply values for variable names.
///
/// `resolve` returns `None` when the name is unbound. It receives the
/// context so that bindings backed by other expressions evaluate with the
/// same counters and deadline.
pub trait VariableSource {
    fn resolve(&self, name: &str, ctx: &mut EvaluationContext<'_>) -> Option<Result<f64, Error>>;
}

/// A source with no bindings at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl VariableSource for NoVariables {
    fn resolve(&self, _name: &str, _ctx: &mut EvaluationContext<'_>) -> Option<Result<f64, Error>> {
        None
    }
}

/// Bindings, counters, deadline and limits for one evaluation.
///
/// A fresh context is created per top-level call, so resolution counters from
/// an earlier call never leak into a later one. Each summation iteration gets
/// a child context with its own counters that shares the bindings and the
/// deadline.
pub struct EvaluationContext<'a> {
    variables: &'a dyn VariableSource,
    timeout: &'a TimeoutManager,
    hits: HashMap<EcoString, usize>,
    limits: Limits,
    summation_index: Option<f64>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(variables: &'a dyn VariableSource, timeout: &'a TimeoutManager, limits: Limits) -> Self {
        Self {
            variables,
            timeout,
            hits: HashMap::new(),
            limits,
            summation_index: None,
        }
    }

    /// Child context for one summation iteration with `n` bound to `index`.
    pub fn summation_scope(&self, index: f64) -> EvaluationContext<'a> {
        EvaluationContext {
            variables: self.variables,
            timeout: self.timeout,
            hits: HashMap::new(),
            limits: self.limits,
            summation_index: Some(index),
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn timeout(&self) -> &'a TimeoutManager {
        self.timeout
    }

    pub fn summation_index(&self) -> Option<f64> {
        self.summation_index
    }

    /// Number of times `name` has been resolved in this context.
    pub fn hits(&self, name: &str) -> usize {
        self.hits.get(name).copied().unwrap_or(0)
    }

    #[inline]
    pub fn check_timeout(&self) -> Result<(), Error> {
        Ok(self.timeout.check()?)
    }

    /// Resolve a variable, counting the resolution against the
    /// recursive-substitution limit.
    ///
    /// Inside a summation `n` is the loop index and is not counted.
    pub fn resolve_variable(&mut self, name: &str) -> Result<f64, Error> {
        if name == SUMMATION_INDEX {
            if let Some(index) = self.summation_index {
                return Ok(index);
            }
        }

        let count = match self.hits.get_mut(name) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.hits.insert(EcoString::from(name), 1);
                1
            }
        };
        let limit = self.limits.max_recursive_substitutions;
        if count > limit {
            return Err(EvaluationError::RecursiveVariable {
                name: name.into(),
                limit,
            }
            .into());
        }

        let variables = self.variables;
        match variables.resolve(name, self) {
            Some(result) => result,
            None => Err(Error::VariableNotSet { name: name.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl VariableSource for Fixed {
        fn resolve(&self, name: &str, _ctx: &mut EvaluationContext<'_>) -> Option<Result<f64, Error>> {
            (name == "x").then_some(Ok(self.0))
        }
    }

    #[test]
    fn test_unbound_variable() {
        let timeout = TimeoutManager::default();
        let mut ctx = EvaluationContext::new(&NoVariables, &timeout, Limits::default());
        assert_eq!(
            ctx.resolve_variable("x"),
            Err(Error::VariableNotSet { name: "x".into() })
        );
    }

    #[test]
    fn test_resolution_counts_hits() {
        let timeout = TimeoutManager::default();
        let source = Fixed(4.0);
        let mut ctx = EvaluationContext::new(&source, &timeout, Limits::new(2, 0));
        assert_eq!(ctx.resolve_variable("x"), Ok(4.0));
        assert_eq!(ctx.resolve_variable("x"), Ok(4.0));
        assert_eq!(ctx.hits("x"), 2);
        assert!(matches!(
            ctx.resolve_variable("x"),
            Err(Error::Evaluation(EvaluationError::RecursiveVariable { limit: 2, .. }))
        ));
    }

    #[test]
    fn test_summation_scope_binds_index_with_fresh_counters() {
        let timeout = TimeoutManager::default();
        let source = Fixed(4.0);
        let mut ctx = EvaluationContext::new(&source, &timeout, Limits::default());
        ctx.resolve_variable("x").unwrap();

        let mut scope = ctx.summation_scope(3.0);
        assert_eq!(scope.hits("x"), 0);
        assert_eq!(scope.resolve_variable("n"), Ok(3.0));
        assert_eq!(scope.hits("n"), 0);
        assert_eq!(scope.resolve_variable("x"), Ok(4.0));
    }

    #[test]
    fn test_limits_validation() {
        assert!(Limits::new(2, 0).validate().is_ok());
        assert!(Limits::new(1000, 5).validate().is_ok());
        assert!(matches!(
            Limits::new(1, 0).validate(),
            Err(Error::InvalidOption(_))
        ));
        assert!(matches!(
            Limits::new(1001, 0).validate(),
            Err(Error::InvalidOption(_))
        ));
    }
}
