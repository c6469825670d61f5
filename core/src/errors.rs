//! Error types for parsing and evaluating formulas.
//!
//! All failures are terminal for the operation in progress. The only place
//! errors are swallowed is constant folding, which keeps a subtree unreduced
//! when its speculative evaluation fails.

use core::fmt;

use ecow::EcoString;
use thiserror::Error;

/// Top-level error returned by every fallible operation of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed syntax, unknown function or arity, unbalanced parentheses,
    /// trailing input.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A referenced variable has no binding in the current context.
    #[error("Variable '{name}' is not set")]
    VariableNotSet { name: EcoString },

    /// Domain violation during evaluation.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// A logic operator received an operand that is neither 0 nor 1.
    #[error("Logic error: {value} is not a boolean value (expected 0 or 1)")]
    Logic { value: f64 },

    /// The deadline passed, or the evaluation was cancelled.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// Runaway variable resolution in an equation graph, usually a cycle.
    #[error("Operation limit exceeded: variable '{name}' resolved {limit} times")]
    OperationLimitExceeded { name: EcoString, limit: usize },

    /// A configuration value is out of its accepted range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl Error {
    /// Returns `true` if this error is a missing binding for `name`.
    pub fn is_variable_not_set(&self, name: &str) -> bool {
        matches!(self, Error::VariableNotSet { name: missing } if missing.as_str() == name)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

/// Parser error with the byte position at which it was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at position {position}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into `input`.
    pub position: usize,
    pub input: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize, input: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            input: input.into(),
        }
    }

    /// A short hint suitable for diagnostics, if one applies.
    pub fn help(&self) -> Option<&'static str> {
        match self.kind {
            ParseErrorKind::UnclosedParenthesis => Some("Add the missing ')'"),
            ParseErrorKind::UnknownFunction { .. } => Some(
                "Known functions: rand, sqrt, sin, cos, tan, log, log10, ln, floor, ceil, round, abs, if, sum",
            ),
            ParseErrorKind::EmptyArgument => Some("Remove the extra ',' or fill in the argument"),
            _ => None,
        }
    }
}

/// Specific kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("Unexpected character '{found}'")]
    UnexpectedCharacter { found: char },

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unclosed parenthesis")]
    UnclosedParenthesis,

    #[error("Unknown function '{name}' with {arity} argument(s)")]
    UnknownFunction { name: EcoString, arity: usize },

    #[error("Invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("Unexpected trailing input starting with '{found}'")]
    TrailingInput { found: char },

    #[error("Empty argument")]
    EmptyArgument,
}

/// Domain violations raised while evaluating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Divide by 0")]
    DivideByZero,

    #[error("Infinity")]
    Infinity,

    #[error("NaN")]
    NaN,

    #[error("Summation upper bound {to} is lower than lower bound {from}")]
    SummationBounds { from: f64, to: f64 },

    #[error("Summation of {length} iterations exceeds the limit of {limit}")]
    SummationTooLong { length: f64, limit: usize },

    #[error("Variable '{name}' is recursive (resolved more than {limit} times)")]
    RecursiveVariable { name: EcoString, limit: usize },
}

/// The deadline of a [`TimeoutManager`](crate::timeout::TimeoutManager)
/// passed, or its cancellation token fired.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutError {
    pub cancelled: bool,
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cancelled {
            write!(f, "Evaluation cancelled")
        } else {
            write!(f, "Evaluation timed out")
        }
    }
}

impl std::error::Error for TimeoutError {}
