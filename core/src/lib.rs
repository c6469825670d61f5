//! Arithmetic and logic formula engine.
//!
//! Text is parsed into an immutable tree ([`Expression`]), constant subtrees
//! are folded while parsing, and the tree is evaluated against caller-supplied
//! bindings under a cooperative deadline.
//!
//! ```
//! use formulon_core::{Expression, Variables};
//!
//! let expr = Expression::parse("2x + sum(1, 3, n)").unwrap();
//! let vars = Variables::from([("x", 5.0)]);
//! assert_eq!(expr.evaluate_with(&vars), Ok(16.0));
//! ```

pub mod ast;
pub mod context;
pub mod cursor;
pub mod equation;
pub mod errors;
pub mod expression;
pub mod numeric;
pub mod parser;
pub mod stack;
pub mod timeout;
pub mod variables;

pub use context::{EvaluationContext, Limits, NoVariables, VariableSource};
pub use equation::Equation;
pub use errors::{Error, EvaluationError, ParseError, ParseErrorKind, TimeoutError};
pub use expression::{EvaluationOptions, Expression};
pub use parser::{ParseOptions, Parser, ParserBuilder, parse};
pub use timeout::{CancelToken, TimeoutManager};
pub use variables::{Binding, ValueProvider, Variables};
