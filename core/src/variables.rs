//! Caller-supplied variable bindings.

use core::fmt;
use std::sync::Arc;

use ecow::EcoString;
use hashbrown::HashMap;

use crate::context::{EvaluationContext, VariableSource};
use crate::errors::Error;
use crate::expression::Expression;
use crate::numeric::check_finite;

/// Supplies a value on demand, each time the variable is read.
pub trait ValueProvider: Send + Sync {
    fn value(&self) -> Result<f64, Error>;
}

impl<F> ValueProvider for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn value(&self) -> Result<f64, Error> {
        Ok(self())
    }
}

/// What a variable name is bound to.
#[derive(Clone)]
pub enum Binding {
    Value(f64),
    Provider(Arc<dyn ValueProvider>),
    /// Another formula, evaluated in the caller's context every time the
    /// variable is read.
    Expression(Expression),
}

impl Binding {
    pub fn provider(provider: impl ValueProvider + 'static) -> Self {
        Binding::Provider(Arc::new(provider))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Provider(_) => f.write_str("Provider(..)"),
            Binding::Expression(expr) => f.debug_tuple("Expression").field(&expr.source()).finish(),
        }
    }
}

impl From<f64> for Binding {
    fn from(value: f64) -> Self {
        Binding::Value(value)
    }
}

impl From<Expression> for Binding {
    fn from(expr: Expression) -> Self {
        Binding::Expression(expr)
    }
}

/// A name to binding map.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    bindings: HashMap<EcoString, Binding>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier binding.
    pub fn set(&mut self, name: impl Into<EcoString>, binding: impl Into<Binding>) -> &mut Self {
        self.bindings.insert(name.into(), binding.into());
        self
    }

    pub fn with(mut self, name: impl Into<EcoString>, binding: impl Into<Binding>) -> Self {
        self.set(name, binding);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(EcoString::as_str)
    }
}

impl VariableSource for Variables {
    fn resolve(&self, name: &str, ctx: &mut EvaluationContext<'_>) -> Option<Result<f64, Error>> {
        let binding = self.bindings.get(name)?;
        Some(match binding {
            Binding::Value(value) => check_finite(*value),
            Binding::Provider(provider) => provider.value().and_then(check_finite),
            Binding::Expression(expr) => expr.evaluate_in_context(ctx),
        })
    }
}

impl<K, B> FromIterator<(K, B)> for Variables
where
    K: Into<EcoString>,
    B: Into<Binding>,
{
    fn from_iter<I: IntoIterator<Item = (K, B)>>(iter: I) -> Self {
        let bindings = iter
            .into_iter()
            .map(|(name, binding)| (name.into(), binding.into()))
            .collect();
        Self { bindings }
    }
}

impl<K, B, const N: usize> From<[(K, B); N]> for Variables
where
    K: Into<EcoString>,
    B: Into<Binding>,
{
    fn from(entries: [(K, B); N]) -> Self {
        entries.into_iter().collect()
    }
}
