//! Formulas whose variables may themselves be formulas.
//!
//! An [`Equation`] owns a root expression and a set of named bindings. A
//! binding can refer to other bindings, including itself, so resolution is
//! capped per name and per call to catch cycles.

use core::cell::RefCell;

use ecow::EcoString;
use hashbrown::HashMap;

use crate::context::{EvaluationContext, VariableSource};
use crate::errors::Error;
use crate::expression::Expression;
use crate::timeout::TimeoutManager;
use crate::variables::{Binding, Variables};

/// How often one name may be resolved through an equation in a single call.
pub const EQUATION_RESOLUTION_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct Equation {
    expression: Expression,
    variables: Variables,
}

impl Equation {
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            variables: Variables::new(),
        }
    }

    /// Parse `text` with default options and wrap it.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(Self::new(Expression::parse(text)?))
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Bind `name` to a value, a provider, or another expression.
    pub fn set_variable(&mut self, name: impl Into<EcoString>, binding: impl Into<Binding>) -> &mut Self {
        self.variables.set(name, binding);
        self
    }

    /// Evaluate with the default timeout.
    pub fn evaluate(&self) -> Result<f64, Error> {
        self.evaluate_with_timeout(&TimeoutManager::default())
    }

    pub fn evaluate_with_timeout(&self, timeout: &TimeoutManager) -> Result<f64, Error> {
        let graph = Graph {
            variables: &self.variables,
            resolutions: RefCell::new(HashMap::new()),
        };
        self.expression.evaluate_with_timeout(&graph, timeout)
    }
}

/// Bindings of one equation plus the live counters of one call.
struct Graph<'a> {
    variables: &'a Variables,
    resolutions: RefCell<HashMap<EcoString, usize>>,
}

impl Graph<'_> {
    fn count(&self, name: &str) -> Result<(), Error> {
        let mut resolutions = self.resolutions.borrow_mut();
        let count = match resolutions.get_mut(name) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                resolutions.insert(name.into(), 1);
                1
            }
        };
        if count >= EQUATION_RESOLUTION_LIMIT {
            tracing::debug!(name, count, "equation resolution limit reached");
            return Err(Error::OperationLimitExceeded {
                name: name.into(),
                limit: EQUATION_RESOLUTION_LIMIT,
            });
        }
        Ok(())
    }
}

impl VariableSource for Graph<'_> {
    fn resolve(&self, name: &str, ctx: &mut EvaluationContext<'_>) -> Option<Result<f64, Error>> {
        self.variables.get(name)?;
        if let Err(err) = self.count(name) {
            return Some(Err(err));
        }
        self.variables.resolve(name, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvaluationError;
    use std::time::Duration;

    fn expr(text: &str) -> Expression {
        Expression::parse(text).unwrap()
    }

    #[test]
    fn test_chained_bindings() {
        let mut equation = Equation::parse("a + b").unwrap();
        equation
            .set_variable("a", expr("b * 2"))
            .set_variable("b", 3.0);
        assert_eq!(equation.evaluate(), Ok(9.0));
    }

    #[test]
    fn test_cycle_hits_operation_limit() {
        let mut equation = Equation::parse("a").unwrap();
        equation.set_variable("a", expr("b")).set_variable("b", expr("a"));
        assert!(matches!(
            equation.evaluate(),
            Err(Error::OperationLimitExceeded {
                limit: EQUATION_RESOLUTION_LIMIT,
                ..
            })
        ));
    }

    #[test]
    fn test_counters_reset_between_calls() {
        let mut equation = Equation::parse("sum(1, 300, x)").unwrap();
        equation.set_variable("x", 1.0);
        assert_eq!(equation.evaluate(), Ok(300.0));
        assert_eq!(equation.evaluate(), Ok(300.0));
    }

    #[test]
    fn test_counters_span_summation_iterations() {
        let mut equation = Equation::parse("sum(1, 600, x)").unwrap();
        equation.set_variable("x", 1.0);
        assert!(matches!(
            equation.evaluate(),
            Err(Error::OperationLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_unbound_variable() {
        let equation = Equation::parse("a + 1").unwrap();
        assert!(equation.evaluate().unwrap_err().is_variable_not_set("a"));
    }

    #[test]
    fn test_provider_binding() {
        let mut equation = Equation::parse("x / 2").unwrap();
        equation.set_variable("x", Binding::provider(|| 8.0));
        assert_eq!(equation.evaluate(), Ok(4.0));
    }

    #[test]
    fn test_errors_from_bindings_propagate() {
        let mut equation = Equation::parse("a").unwrap();
        equation.set_variable("a", expr("1 / z")).set_variable("z", 0.0);
        assert_eq!(
            equation.evaluate(),
            Err(EvaluationError::DivideByZero.into())
        );
    }

    #[test]
    fn test_timeout() {
        let mut equation = Equation::parse("a").unwrap();
        equation.set_variable("a", 1.0);
        let timeout = TimeoutManager::new(Duration::ZERO);
        assert!(equation.evaluate_with_timeout(&timeout).unwrap_err().is_timeout());
    }
}
