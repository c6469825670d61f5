//! Recursive-descent parser.
//!
//! Precedence, loosest first:
//!
//! ```text
//! expression := or
//! or         := and        (("||" | "|") and)*
//! and        := comparison (("&&" | "&") comparison)*
//! comparison := additive   (cmp_op additive)*
//! additive   := term       (("+" | "-") term)*
//! term       := unary      (("*" | "/" | "%") unary | <implicit> power)*
//! unary      := ("-" | "+") unary | power
//! power      := primary    ("^" unary)?
//! primary    := "(" expression ")" | number | identifier ["(" args ")"]
//! ```
//!
//! Every node is passed through [`fold`] right after it is built, so constant
//! subtrees are reduced bottom-up. Constancy travels with each parsed subtree
//! so folding never has to walk back down the tree.

use smallvec::SmallVec;

use crate::ast::{
    BinaryOp, ComparisonOp, LogicOp, Node, NullaryOp, SUMMATION_INDEX, TrinaryOp, UnaryOp,
};
use crate::cursor::{Cursor, is_digit, is_identifier_char, is_letter_or_underscore};
use crate::errors::{Error, ParseErrorKind};
use crate::stack::ensure_sufficient_stack;
use crate::timeout::TimeoutManager;

use super::fold::fold;
use super::options::ParseOptions;

type Arguments = SmallVec<[Parsed; 3]>;

/// A subtree and whether it needs no bindings, as [`Node::is_constant`]
/// would report.
struct Parsed {
    node: Node,
    constant: bool,
}

impl Parsed {
    fn new(node: Node, constant: bool) -> Self {
        Self { node, constant }
    }

    fn boxed(self) -> Box<Node> {
        Box::new(self.node)
    }
}

pub(crate) struct ExpressionParser<'src, 't, 'o> {
    cursor: Cursor<'src, 't>,
    options: &'o ParseOptions,
    /// Currently inside the arguments of `sum(...)`.
    inside_summation: bool,
}

impl<'src, 't, 'o> ExpressionParser<'src, 't, 'o> {
    pub(crate) fn new(
        source: &'src str,
        timeout: &'t TimeoutManager,
        options: &'o ParseOptions,
    ) -> Self {
        Self {
            cursor: Cursor::new(source, timeout),
            options,
            inside_summation: options.inside_summation,
        }
    }

    /// Parse the whole input, wrapped in a finiteness check.
    pub(crate) fn parse(mut self) -> Result<Node, Error> {
        self.cursor.skip_whitespace()?;
        if self.cursor.is_at_end() {
            return Err(self.cursor.error(ParseErrorKind::UnexpectedEnd));
        }

        let expr = self.parse_expression()?;

        self.cursor.skip_whitespace()?;
        if let Some(found) = self.cursor.current() {
            return Err(self.cursor.error(ParseErrorKind::TrailingInput { found }));
        }
        Ok(Node::Finite(expr.boxed()))
    }

    fn finish(&self, node: Node, constant: bool) -> Result<Parsed, Error> {
        let node = if constant && self.options.fold_constants {
            fold(node, self.cursor.timeout(), self.options.limits)?
        } else {
            node
        };
        Ok(Parsed::new(node, constant))
    }

    fn parse_expression(&mut self) -> Result<Parsed, Error> {
        ensure_sufficient_stack(|| self.parse_or())
    }

    fn parse_or(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_and()?;
        while self.cursor.eat_str("||")? || self.cursor.eat('|')? {
            let right = self.parse_and()?;
            let constant = left.constant && right.constant;
            left = self.finish(
                Node::Logic {
                    op: LogicOp::Or,
                    left: left.boxed(),
                    right: right.boxed(),
                },
                constant,
            )?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_comparison()?;
        while self.cursor.eat_str("&&")? || self.cursor.eat('&')? {
            let right = self.parse_comparison()?;
            let constant = left.constant && right.constant;
            left = self.finish(
                Node::Logic {
                    op: LogicOp::And,
                    left: left.boxed(),
                    right: right.boxed(),
                },
                constant,
            )?;
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.comparison_op()? {
            let right = self.parse_additive()?;
            let constant = left.constant && right.constant;
            left = self.finish(
                Node::Comparison {
                    op,
                    left: left.boxed(),
                    right: right.boxed(),
                },
                constant,
            )?;
        }
        Ok(left)
    }

    /// Consume a comparison operator if one is next. Longer spellings are
    /// tried before their prefixes.
    fn comparison_op(&mut self) -> Result<Option<ComparisonOp>, Error> {
        const OPERATORS: [(&str, ComparisonOp); 8] = [
            ("<=", ComparisonOp::Le),
            ("<>", ComparisonOp::LtGt),
            ("<", ComparisonOp::Lt),
            (">=", ComparisonOp::Ge),
            (">", ComparisonOp::Gt),
            ("==", ComparisonOp::EqEq),
            ("=", ComparisonOp::Eq),
            ("!=", ComparisonOp::Ne),
        ];
        for (symbol, op) in OPERATORS {
            if self.cursor.eat_str(symbol)? {
                return Ok(Some(op));
            }
        }
        Ok(None)
    }

    fn parse_additive(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_term()?;
        loop {
            let op = if self.cursor.eat('+')? {
                BinaryOp::Add
            } else if self.cursor.eat('-')? {
                BinaryOp::Sub
            } else {
                return Ok(left);
            };
            let right = self.parse_term()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn parse_term(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_unary()?;
        loop {
            let (op, right) = if self.cursor.eat('*')? {
                (BinaryOp::Mul, self.parse_unary()?)
            } else if self.cursor.eat('/')? {
                (BinaryOp::Div, self.parse_unary()?)
            } else if self.cursor.eat('%')? {
                (BinaryOp::Mod, self.parse_unary()?)
            } else if self.implicit_multiplication_follows() {
                // `2x`, `2(3)`, `2 pi`: the right operand carries no sign.
                (BinaryOp::Mul, self.parse_power()?)
            } else {
                return Ok(left);
            };
            left = self.binary(op, left, right)?;
        }
    }

    fn implicit_multiplication_follows(&self) -> bool {
        self.cursor
            .peek_token()
            .is_some_and(|c| c == '(' || c == '.' || is_digit(c) || is_letter_or_underscore(c))
    }

    // Sign chains and `^` chains recurse without passing through
    // `parse_expression`, so both need their own stack guard.
    fn parse_unary(&mut self) -> Result<Parsed, Error> {
        ensure_sufficient_stack(|| {
            if self.cursor.eat('-')? {
                let arg = self.parse_unary()?;
                let constant = arg.constant;
                return self.finish(
                    Node::Unary {
                        op: UnaryOp::Neg,
                        arg: arg.boxed(),
                    },
                    constant,
                );
            }
            if self.cursor.eat('+')? {
                return self.parse_unary();
            }
            self.parse_power()
        })
    }

    fn parse_power(&mut self) -> Result<Parsed, Error> {
        ensure_sufficient_stack(|| {
            let base = self.parse_primary()?;
            if self.cursor.eat('^')? {
                // Recursing through unary makes `^` right-associative.
                let exponent = self.parse_unary()?;
                return self.binary(BinaryOp::Pow, base, exponent);
            }
            Ok(base)
        })
    }

    fn parse_primary(&mut self) -> Result<Parsed, Error> {
        self.cursor.skip_whitespace()?;
        let start = self.cursor.position();
        match self.cursor.current() {
            Some('(') => {
                self.cursor.advance()?;
                let inner = self.parse_expression()?;
                self.expect_close(start)?;
                let constant = inner.constant;
                self.finish(
                    Node::Unary {
                        op: UnaryOp::Paren,
                        arg: inner.boxed(),
                    },
                    constant,
                )
            }
            Some(c) if is_digit(c) || c == '.' => self.parse_number(),
            Some(c) if is_letter_or_underscore(c) => self.parse_identifier(),
            _ => Err(self.cursor.unexpected()),
        }
    }

    /// Consume `)` closing the parenthesis opened at `open`.
    fn expect_close(&mut self, open: usize) -> Result<(), Error> {
        if self.cursor.eat(')')? {
            return Ok(());
        }
        self.cursor.skip_whitespace()?;
        if self.cursor.is_at_end() {
            Err(self
                .cursor
                .error_at(ParseErrorKind::UnclosedParenthesis, open))
        } else {
            Err(self.cursor.unexpected())
        }
    }

    /// Digits with an optional fraction and an optional exponent.
    ///
    /// `e` only starts an exponent when a digit follows (after an optional
    /// sign), so `2e` is `2 * e`.
    fn parse_number(&mut self) -> Result<Parsed, Error> {
        let start = self.cursor.position();
        while self
            .cursor
            .current()
            .is_some_and(|c| is_digit(c) || c == '.')
        {
            self.cursor.advance()?;
        }

        if matches!(self.cursor.current(), Some('e' | 'E')) {
            let sign = matches!(self.cursor.peek_nth(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.cursor.peek_nth(digit_at).is_some_and(is_digit) {
                for _ in 0..digit_at {
                    self.cursor.advance()?;
                }
                while self.cursor.current().is_some_and(is_digit) {
                    self.cursor.advance()?;
                }
            }
        }

        let text = self.cursor.slice(start, self.cursor.position());
        match text.parse::<f64>() {
            // `1e999` overflows to infinity, which has no literal spelling.
            Ok(value) if value.is_finite() => Ok(Parsed::new(Node::Number(value), true)),
            _ => Err(self.cursor.error_at(
                ParseErrorKind::InvalidNumber {
                    text: text.to_string(),
                },
                start,
            )),
        }
    }

    /// A named constant, a variable, or a function call.
    fn parse_identifier(&mut self) -> Result<Parsed, Error> {
        let start = self.cursor.position();
        while self.cursor.current().is_some_and(is_identifier_char) {
            self.cursor.advance()?;
        }
        let name = self.cursor.slice(start, self.cursor.position());

        // Only an immediately following `(` makes a call; `x (y)` is `x * (y)`.
        let open = self.cursor.position();
        if self.cursor.current() == Some('(') {
            self.cursor.advance()?;
            let outer = self.inside_summation;
            if matches!(name, "sum" | "summation") {
                self.inside_summation = true;
            }
            let args = self.parse_arguments(open);
            self.inside_summation = outer;
            return self.call(name, args?, start);
        }

        if let Some(constant) = Node::named_constant(name) {
            return Ok(Parsed::new(constant, true));
        }
        let constant = self.inside_summation && name == SUMMATION_INDEX;
        Ok(Parsed::new(
            Node::Variable {
                name: name.into(),
                in_summation: self.inside_summation,
            },
            constant,
        ))
    }

    /// Comma-separated arguments up to the matching `)`.
    ///
    /// Nested calls and parentheses are handled by the recursive descent
    /// itself, so only top-level commas separate arguments.
    fn parse_arguments(&mut self, open: usize) -> Result<Arguments, Error> {
        let mut args = Arguments::new();
        if self.cursor.eat(')')? {
            return Ok(args);
        }
        loop {
            self.cursor.skip_whitespace()?;
            match self.cursor.current() {
                None => {
                    return Err(self
                        .cursor
                        .error_at(ParseErrorKind::UnclosedParenthesis, open));
                }
                Some(',' | ')') => return Err(self.cursor.error(ParseErrorKind::EmptyArgument)),
                Some(_) => {}
            }

            args.push(self.parse_expression()?);

            if self.cursor.eat(',')? {
                continue;
            }
            self.expect_close(open)?;
            return Ok(args);
        }
    }

    /// Dispatch a call by name and arity.
    fn call(&self, name: &str, args: Arguments, start: usize) -> Result<Parsed, Error> {
        let arity = args.len();
        let constant = arity > 0 && args.iter().all(|arg| arg.constant);
        let unknown = || {
            self.cursor.error_at(
                ParseErrorKind::UnknownFunction {
                    name: name.into(),
                    arity,
                },
                start,
            )
        };

        let node = match arity {
            0 => match name {
                "rand" | "random" => Node::Nullary(NullaryOp::Random),
                _ => return Err(unknown()),
            },
            1 => {
                let op = unary_function(name).ok_or_else(unknown)?;
                let [arg] = exactly(args).ok_or_else(unknown)?;
                Node::Unary { op, arg }
            }
            2 => {
                let op = binary_function(name).ok_or_else(unknown)?;
                let [left, right] = exactly(args).ok_or_else(unknown)?;
                Node::Binary { op, left, right }
            }
            3 => {
                let [first, second, third] = exactly(args).ok_or_else(unknown)?;
                match name {
                    "if" => Node::Trinary {
                        op: TrinaryOp::If,
                        first,
                        second,
                        third,
                    },
                    "sum" | "summation" => Node::Summation {
                        from: first,
                        to: second,
                        body: third,
                    },
                    _ => return Err(unknown()),
                }
            }
            _ => return Err(unknown()),
        };
        self.finish(node, constant)
    }

    fn binary(&self, op: BinaryOp, left: Parsed, right: Parsed) -> Result<Parsed, Error> {
        let constant = left.constant && right.constant;
        self.finish(
            Node::Binary {
                op,
                left: left.boxed(),
                right: right.boxed(),
            },
            constant,
        )
    }
}

fn exactly<const N: usize>(args: Arguments) -> Option<[Box<Node>; N]> {
    let boxed: Vec<Box<Node>> = args.into_iter().map(Parsed::boxed).collect();
    boxed.try_into().ok()
}

fn unary_function(name: &str) -> Option<UnaryOp> {
    Some(match name {
        "sqrt" => UnaryOp::Sqrt,
        "sin" => UnaryOp::Sin,
        "cos" => UnaryOp::Cos,
        "tan" => UnaryOp::Tan,
        "log" | "log10" => UnaryOp::Log10,
        "ln" => UnaryOp::Ln,
        "floor" => UnaryOp::Floor,
        "ceil" | "ceiling" => UnaryOp::Ceil,
        "round" => UnaryOp::Round,
        "abs" | "absolute" => UnaryOp::Abs,
        _ => return None,
    })
}

fn binary_function(name: &str) -> Option<BinaryOp> {
    Some(match name {
        "log" | "log10" => BinaryOp::LogBase,
        "floor" => BinaryOp::FloorPlaces,
        "ceil" | "ceiling" => BinaryOp::CeilPlaces,
        "round" => BinaryOp::RoundPlaces,
        _ => return None,
    })
}
