use std::time::Duration;

use formulon::{Binding, Equation, Error, Expression, TimeoutManager};
use pretty_assertions::assert_eq;

fn expr(text: &str) -> Expression {
    Expression::parse(text).unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", text, e))
}

#[test]
fn test_variables_referencing_variables() {
    let mut equation = Equation::parse("total").unwrap();
    equation
        .set_variable("total", expr("price * quantity * (1 + tax)"))
        .set_variable("price", 20.0)
        .set_variable("quantity", expr("round(weight / 2)"))
        .set_variable("weight", 7.0)
        .set_variable("tax", 0.25);
    assert_eq!(equation.evaluate(), Ok(100.0));
}

#[test]
fn test_two_variable_cycle() {
    let mut equation = Equation::parse("a").unwrap();
    equation.set_variable("a", expr("b")).set_variable("b", expr("a"));
    assert!(matches!(
        equation.evaluate(),
        Err(Error::OperationLimitExceeded { limit: 500, .. })
    ));
}

#[test]
fn test_cycle_through_summation() {
    let mut equation = Equation::parse("s").unwrap();
    equation.set_variable("s", expr("sum(1, 2, s)"));
    assert!(matches!(
        equation.evaluate(),
        Err(Error::OperationLimitExceeded { .. })
    ));
}

#[test]
fn test_rebinding_replaces_value() {
    let mut equation = Equation::parse("a * 2").unwrap();
    equation.set_variable("a", 1.0);
    assert_eq!(equation.evaluate(), Ok(2.0));
    equation.set_variable("a", expr("3 + 1"));
    assert_eq!(equation.evaluate(), Ok(8.0));
}

#[test]
fn test_repeated_calls_start_fresh() {
    let mut equation = Equation::parse("sum(1, 400, v)").unwrap();
    equation.set_variable("v", Binding::provider(|| 0.5));
    for _ in 0..3 {
        assert_eq!(equation.evaluate(), Ok(200.0));
    }
}

#[test]
fn test_equation_timeout() {
    let mut equation = Equation::parse("a + 1").unwrap();
    equation.set_variable("a", 1.0);
    let timeout = TimeoutManager::new(Duration::ZERO);
    assert!(equation.evaluate_with_timeout(&timeout).unwrap_err().is_timeout());
}

#[test]
fn test_equation_renders_its_expression() {
    let equation = Equation::parse("a + sqrt(4)").unwrap();
    assert_eq!(equation.expression().render(false), "a + sqrt(4)");
    assert_eq!(equation.expression().render(true), "a + 2");
}
