mod fold;
mod options;
#[allow(clippy::module_inception)]
mod parser;

pub use options::{ParseOptions, Parser, ParserBuilder};

use crate::errors::Error;
use crate::expression::Expression;

/// Parse `text` with the default options: constant folding on, 5 second
/// timeout, default limits.
pub fn parse(text: &str) -> Result<Expression, Error> {
    Parser::new().parse(text)
}


#[cfg(test)]
mod precedence_test;
