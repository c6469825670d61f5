//! Parser configuration.

use std::time::Duration;

use crate::context::Limits;
use crate::errors::Error;
use crate::expression::Expression;
use crate::timeout::{CancelToken, DEFAULT_TIMEOUT, TimeoutManager};

use super::parser::ExpressionParser;

/// Options controlling how text is compiled into an [`Expression`].
///
/// # Example
///
/// ```
/// use formulon_core::parser::Parser;
/// use std::time::Duration;
///
/// let parser = Parser::builder()
///     .timeout(Duration::from_millis(250))
///     .fold_constants(false)
///     .build()
///     .unwrap();
/// let expr = parser.parse("sqrt(4) + 1").unwrap();
/// assert_eq!(expr.render(true), "sqrt(4) + 1");
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Deadline for parsing, including constant folding.
    ///
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Optional token to cancel parsing from another thread.
    pub cancel_token: Option<CancelToken>,

    /// Treat the whole input as the body of a summation, so `n` is the loop
    /// index. Used when parsing summation arguments.
    ///
    /// Default: false
    pub inside_summation: bool,

    /// Precompute constant subtrees while parsing.
    ///
    /// Default: true
    pub fold_constants: bool,

    /// Limits used while folding, and the default limits of the parsed
    /// expression.
    pub limits: Limits,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cancel_token: None,
            inside_summation: false,
            fold_constants: true,
            limits: Limits::default(),
        }
    }
}

/// Compiles formula text into expressions.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// A timeout manager for one parse, started now.
    fn timeout_manager(&self) -> TimeoutManager {
        match &self.options.cancel_token {
            Some(token) => TimeoutManager::with_cancel_token(self.options.timeout, token.clone()),
            None => TimeoutManager::new(self.options.timeout),
        }
    }

    /// Parse `source` with a fresh deadline.
    pub fn parse(&self, source: &str) -> Result<Expression, Error> {
        let timeout = self.timeout_manager();
        self.parse_with_timeout(source, &timeout)
    }

    /// Parse `source` against an existing deadline.
    pub fn parse_with_timeout(
        &self,
        source: &str,
        timeout: &TimeoutManager,
    ) -> Result<Expression, Error> {
        tracing::debug!(source, "parsing formula");
        let root = ExpressionParser::new(source, timeout, &self.options).parse()?;
        Ok(Expression::new(source, root, self.options.limits))
    }
}

/// Builder for [`Parser`].
#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    options: ParseOptions,
}

impl ParserBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.options.cancel_token = Some(token);
        self
    }

    pub fn inside_summation(mut self, inside_summation: bool) -> Self {
        self.options.inside_summation = inside_summation;
        self
    }

    pub fn fold_constants(mut self, fold_constants: bool) -> Self {
        self.options.fold_constants = fold_constants;
        self
    }

    /// Must lie in `2..=1000`; checked by [`build`](Self::build).
    pub fn max_recursive_substitutions(mut self, limit: usize) -> Self {
        self.options.limits.max_recursive_substitutions = limit;
        self
    }

    /// `0` disables the cap.
    pub fn max_summation_iterations(mut self, limit: usize) -> Self {
        self.options.limits.max_summation_iterations = limit;
        self
    }

    pub fn build(self) -> Result<Parser, Error> {
        self.options.limits.validate()?;
        Ok(Parser {
            options: self.options,
        })
    }
}
