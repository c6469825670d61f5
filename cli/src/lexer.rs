use logos::Logos;

/// Coarse formula tokens used for highlighting and line validation.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
pub enum Token {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"\|\||&&|<=|>=|==|!=|<>|[-+*/%^<>=&|]")]
    Operator,
}

/// Number of parentheses still open at the end of `buffer`.
///
/// Returns `None` when the buffer contains a character no formula can
/// contain, so the line is handed to the parser for a proper error.
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let mut depth: isize = 0;

    for token_res in Token::lexer(buffer) {
        match token_res {
            Ok(Token::LParen) => depth += 1,
            Ok(Token::RParen) => depth -= 1,
            Ok(_) => {}
            Err(_) => return None,
        }
    }

    if depth < 0 {
        Some(0)
    } else {
        Some(depth as usize)
    }
}

/// Accepts a line once its parentheses are balanced.
pub struct Validator;

impl reedline::Validator for Validator {
    fn validate(&self, line: &str) -> reedline::ValidationResult {
        match calculate_depth(line) {
            Some(depth) if depth > 0 => reedline::ValidationResult::Incomplete,
            _ => reedline::ValidationResult::Complete,
        }
    }
}
