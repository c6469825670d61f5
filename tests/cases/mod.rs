#![allow(dead_code)]

use formulon::{Error, Expression, Variables, parse};
use once_cell::sync::Lazy;

/// Bindings visible to every `test_case!`.
pub static VARIABLES: Lazy<Variables> = Lazy::new(|| {
    Variables::from([("x", 2.0), ("y", 3.0), ("half", 0.5), ("zero", 0.0)])
});

pub fn compile(input: &str) -> Expression {
    parse(input).unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", input, e))
}

pub fn evaluate(input: &str) -> Result<f64, Error> {
    parse(input)?.evaluate_with(&*VARIABLES)
}

/// Declares a module of tests for one formula.
///
/// Every field after `input` is optional:
/// - `value`: the exact evaluation result
/// - `approx`: a value the result must be within `1e-9` of
/// - `error`: a pattern the evaluation error must match
/// - `formatted`: the unreduced rendering
/// - `reduced`: the rendering with folded constants
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        $(value: { $value:expr },)?
        $(approx: { $approx:expr },)?
        $(error: { $error:pat },)?
        $(formatted: { $formatted:expr },)?
        $(reduced: { $reduced:expr },)?
    ) => {
        mod $name {
            #[allow(unused_imports)]
            use super::*;
            #[allow(unused_imports)]
            use pretty_assertions::assert_eq;

            $(
                #[test]
                fn value() {
                    let expected: Result<f64, formulon::Error> = $value;
                    assert_eq!($crate::cases::evaluate($input), expected);
                }
            )?

            $(
                #[test]
                fn approx() {
                    let expected: f64 = $approx;
                    let actual = $crate::cases::evaluate($input)
                        .unwrap_or_else(|e| panic!("{:?} failed: {}", $input, e));
                    assert!(
                        (actual - expected).abs() < 1e-9,
                        "{:?}: expected {}, got {}",
                        $input,
                        expected,
                        actual
                    );
                }
            )?

            $(
                #[test]
                fn error() {
                    let result = $crate::cases::evaluate($input);
                    assert!(matches!(result, Err($error)), "unexpected result: {:?}", result);
                }
            )?

            $(
                #[test]
                fn formatted() {
                    assert_eq!($crate::cases::compile($input).render(false), $formatted);
                }
            )?

            $(
                #[test]
                fn reduced() {
                    assert_eq!($crate::cases::compile($input).render(true), $reduced);
                }
            )?
        }
    };
}
