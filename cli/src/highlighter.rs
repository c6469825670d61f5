use logos::Logos;
use nu_ansi_term::{Color, Style};
use reedline::StyledText;

use crate::lexer::Token;

const DEFAULT: Color = Color::White;
const NUMBER: Color = Color::Cyan;
const CONSTANT: Color = Color::Cyan;
const FUNCTION: Color = Color::Blue;
const VARIABLE: Color = Color::Red;
const OPERATOR: Color = Color::Magenta;
const ERROR: Color = Color::DarkGray;

const CONSTANTS: &[&str] = &["pi", "e", "true", "false"];

pub struct Highlighter;

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();
        let mut curr_end = 0;

        for (token, span) in Token::lexer(line).spanned() {
            if span.start > curr_end {
                output.push((Style::new().fg(DEFAULT), line[curr_end..span.start].to_string()));
            }
            let text = &line[span.clone()];
            let fg = match token {
                Ok(Token::Number) => NUMBER,
                // Only an immediately following `(` makes a call.
                Ok(Token::Ident) if line[span.end..].starts_with('(') => FUNCTION,
                Ok(Token::Ident) if CONSTANTS.contains(&text) => CONSTANT,
                Ok(Token::Ident) => VARIABLE,
                Ok(Token::Operator) => OPERATOR,
                Ok(Token::LParen | Token::RParen | Token::Comma) => DEFAULT,
                Err(_) => ERROR,
            };
            output.push((Style::new().fg(fg), text.to_string()));
            curr_end = span.end;
        }

        if curr_end < line.len() {
            output.push((Style::new().fg(DEFAULT), line[curr_end..].to_string()));
        }
        output
    }
}
