//! Formulon - arithmetic and logic formulas with safe evaluation
//!
//! # Overview
//!
//! Formulon parses textual formulas such as `2x + sum(1, 10, n ^ 2)` into an
//! immutable tree and evaluates them against caller-supplied variables.
//! Evaluation is bounded: every call runs under a deadline, recursive variable
//! substitution is capped, and summation loops have a configurable length
//! limit.
//!
//! # Quick Start
//!
//! ```
//! use formulon::{Expression, Variables};
//!
//! let expr = Expression::parse("if(x > 2, x ^ 2, 0) + pi").unwrap();
//! let vars = Variables::from([("x", 3.0)]);
//! let value = expr.evaluate_with(&vars).unwrap();
//! assert!((value - (9.0 + std::f64::consts::PI)).abs() < 1e-12);
//! ```
//!
//! # Equations
//!
//! Variables may be bound to other formulas. Cycles are detected:
//!
//! ```
//! use formulon::{Equation, Error, Expression};
//!
//! let mut equation = Equation::parse("area * 2").unwrap();
//! equation
//!     .set_variable("area", Expression::parse("side ^ 2").unwrap())
//!     .set_variable("side", 3.0);
//! assert_eq!(equation.evaluate(), Ok(18.0));
//! ```
//!
//! # Errors
//!
//! Every fallible call returns [`Error`]. Use [`render_error`] or
//! [`render_error_to_string`] to print parse errors against their source.

pub use formulon_core::{
    Binding, CancelToken, Equation, Error, EvaluationContext, EvaluationError, EvaluationOptions,
    Expression, Limits, NoVariables, ParseError, ParseErrorKind, ParseOptions, Parser,
    ParserBuilder, TimeoutError, TimeoutManager, ValueProvider, VariableSource, Variables, parse,
};

pub use formulon_core::{ast, numeric};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
