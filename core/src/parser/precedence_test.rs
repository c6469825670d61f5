use crate::ast::{Node, UnaryOp};

use super::Parser;

// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same tree. Parentheses survive parsing as `Paren`
// nodes, so they are stripped before comparing.
fn ast(source: &str) -> Node {
    let parser = Parser::builder().fold_constants(false).build().unwrap();
    let parsed = parser
        .parse(source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e));
    strip_parens(parsed.root())
}

fn strip(child: &Node) -> Box<Node> {
    Box::new(strip_parens(child))
}

fn strip_parens(node: &Node) -> Node {
    match node {
        Node::Unary {
            op: UnaryOp::Paren,
            arg,
        } => strip_parens(arg),
        Node::Unary { op, arg } => Node::Unary {
            op: *op,
            arg: strip(arg),
        },
        Node::Binary { op, left, right } => Node::Binary {
            op: *op,
            left: strip(left),
            right: strip(right),
        },
        Node::Comparison { op, left, right } => Node::Comparison {
            op: *op,
            left: strip(left),
            right: strip(right),
        },
        Node::Logic { op, left, right } => Node::Logic {
            op: *op,
            left: strip(left),
            right: strip(right),
        },
        Node::Trinary {
            op,
            first,
            second,
            third,
        } => Node::Trinary {
            op: *op,
            first: strip(first),
            second: strip(second),
            third: strip(third),
        },
        Node::Summation { from, to, body } => Node::Summation {
            from: strip(from),
            to: strip(to),
            body: strip(body),
        },
        Node::Finite(inner) => Node::Finite(strip(inner)),
        leaf => leaf.clone(),
    }
}

#[test]
fn test_addition_vs_subtraction() {
    assert_eq!(ast("a + b - c"), ast("(a + b) - c"));
    assert_eq!(ast("a - b + c"), ast("(a - b) + c"));
    assert_eq!(
        ast("a + b - c + d - e1 + f"),
        ast("((((a + b) - c) + d) - e1) + f")
    );
}

#[test]
fn test_multiplication_vs_division() {
    assert_eq!(ast("a * b / c"), ast("(a * b) / c"));
    assert_eq!(ast("a / b * c"), ast("(a / b) * c"));
    assert_eq!(ast("a % b * c"), ast("(a % b) * c"));
}

#[test]
fn test_addition_vs_multiplication() {
    assert_eq!(ast("a + b * c"), ast("a + (b * c)"));
    assert_eq!(ast("a * b + c"), ast("(a * b) + c"));
}

#[test]
fn test_and_vs_or() {
    assert_eq!(ast("a && b || c"), ast("(a && b) || c"));
    assert_eq!(ast("a || b && c"), ast("a || (b && c)"));
    assert_eq!(ast("a & b | c"), ast("(a & b) | c"));
}

#[test]
fn test_comparison_vs_logic() {
    assert_eq!(ast("a < b && c > d"), ast("(a < b) && (c > d)"));
    assert_eq!(ast("a + 1 = b"), ast("(a + 1) = b"));
}

#[test]
fn test_unary_vs_binary() {
    assert_eq!(ast("--a"), ast("-(-a)"));
    assert_eq!(ast("-a + b"), ast("(-a) + b"));
    assert_eq!(ast("a + -b"), ast("a + (-b)"));
    assert_eq!(ast("a * -b"), ast("a * (-b)"));
}

#[test]
fn test_exponentiation() {
    assert_eq!(ast("a ^ b ^ c"), ast("a ^ (b ^ c)"));
    assert_eq!(ast("a ^ b ^ c ^ d"), ast("a ^ (b ^ (c ^ d))"));
}

#[test]
fn test_exponentiation_vs_multiplication() {
    assert_eq!(ast("a * b ^ c"), ast("a * (b ^ c)"));
    assert_eq!(ast("a ^ b * c"), ast("(a ^ b) * c"));
}

#[test]
fn test_exponentiation_vs_negation() {
    assert_eq!(ast("-a ^ b"), ast("-(a ^ b)"));
    assert_eq!(ast("a ^ -b"), ast("a ^ (-b)"));
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(ast("2x"), ast("2 * x"));
    assert_eq!(ast("2(a + b)"), ast("2 * (a + b)"));
    assert_eq!(ast("2x ^ 2"), ast("2 * (x ^ 2)"));
    assert_eq!(ast("a b + c"), ast("(a * b) + c"));
}
