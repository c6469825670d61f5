//! Operator and built-in function implementations.

use crate::errors::{Error, EvaluationError};
use crate::numeric::{self, EPSILON};

/// Zero-argument functions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NullaryOp {
    /// Uniform sample from `[0, 1)`.
    Random,
}

impl NullaryOp {
    pub fn name(self) -> &'static str {
        match self {
            NullaryOp::Random => "rand",
        }
    }

    pub(crate) fn apply(self) -> f64 {
        match self {
            NullaryOp::Random => rand::random::<f64>(),
        }
    }
}

/// Prefix operators and one-argument functions.
///
/// Trigonometric functions take degrees.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    /// Parenthesised sub-expression, kept so rendering reproduces the input.
    Paren,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log10,
    Ln,
    Floor,
    Ceil,
    Round,
    Abs,
}

impl UnaryOp {
    /// Function name for call syntax, `None` for `-x` and `(x)`.
    pub fn function_name(self) -> Option<&'static str> {
        match self {
            UnaryOp::Neg | UnaryOp::Paren => None,
            UnaryOp::Sqrt => Some("sqrt"),
            UnaryOp::Sin => Some("sin"),
            UnaryOp::Cos => Some("cos"),
            UnaryOp::Tan => Some("tan"),
            UnaryOp::Log10 => Some("log"),
            UnaryOp::Ln => Some("ln"),
            UnaryOp::Floor => Some("floor"),
            UnaryOp::Ceil => Some("ceil"),
            UnaryOp::Round => Some("round"),
            UnaryOp::Abs => Some("abs"),
        }
    }

    pub(crate) fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Neg => -x,
            UnaryOp::Paren => x,
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Sin => x.to_radians().sin(),
            UnaryOp::Cos => x.to_radians().cos(),
            UnaryOp::Tan => x.to_radians().tan(),
            UnaryOp::Log10 => x.log10(),
            UnaryOp::Ln => x.ln(),
            UnaryOp::Floor => x.floor(),
            UnaryOp::Ceil => x.ceil(),
            UnaryOp::Round => x.round(),
            UnaryOp::Abs => x.abs(),
        }
    }
}

/// Infix arithmetic operators and two-argument functions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    /// `log(x, base)`
    LogBase,
    /// `floor(x, places)`
    FloorPlaces,
    /// `ceil(x, places)`
    CeilPlaces,
    /// `round(x, places)`
    RoundPlaces,
}

impl BinaryOp {
    /// Infix symbol, `None` for call syntax.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            BinaryOp::Add => Some("+"),
            BinaryOp::Sub => Some("-"),
            BinaryOp::Mul => Some("*"),
            BinaryOp::Div => Some("/"),
            BinaryOp::Mod => Some("%"),
            BinaryOp::Pow => Some("^"),
            _ => None,
        }
    }

    /// Function name for call syntax, `None` for infix operators.
    pub fn function_name(self) -> Option<&'static str> {
        match self {
            BinaryOp::LogBase => Some("log"),
            BinaryOp::FloorPlaces => Some("floor"),
            BinaryOp::CeilPlaces => Some("ceil"),
            BinaryOp::RoundPlaces => Some("round"),
            _ => None,
        }
    }

    /// Apply the operator. Division by exactly zero is an error; other
    /// domain problems show up as non-finite results.
    pub(crate) fn apply(self, left: f64, right: f64) -> Result<f64, Error> {
        Ok(match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => {
                if right == 0.0 {
                    return Err(EvaluationError::DivideByZero.into());
                }
                left / right
            }
            BinaryOp::Mod => left % right,
            BinaryOp::Pow => left.powf(right),
            BinaryOp::LogBase => left.ln() / right.ln(),
            BinaryOp::FloorPlaces => numeric::floor_to(left, right),
            BinaryOp::CeilPlaces => numeric::ceil_to(left, right),
            BinaryOp::RoundPlaces => numeric::round_to(left, right),
        })
    }
}

/// Tolerant comparison operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    Ne,
    /// `<>`
    LtGt,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Eq => "=",
            ComparisonOp::EqEq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::LtGt => "<>",
        }
    }

    /// Which outcomes satisfy the operator: (less, equal, greater).
    fn accepts(self) -> (bool, bool, bool) {
        match self {
            ComparisonOp::Lt => (true, false, false),
            ComparisonOp::Le => (true, true, false),
            ComparisonOp::Gt => (false, false, true),
            ComparisonOp::Ge => (false, true, true),
            ComparisonOp::Eq | ComparisonOp::EqEq => (false, true, false),
            ComparisonOp::Ne | ComparisonOp::LtGt => (true, false, true),
        }
    }

    /// Compare `left` against an `EPSILON` band around `right`.
    pub(crate) fn test(self, left: f64, right: f64) -> bool {
        let diff = left - right;
        let (less, equal, greater) = self.accepts();
        if diff.abs() < EPSILON {
            equal
        } else if diff < 0.0 {
            less
        } else {
            greater
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }

    pub(crate) fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicOp::And => left && right,
            LogicOp::Or => left || right,
        }
    }
}

/// Three-argument functions other than summation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrinaryOp {
    /// `if(condition, then, else)`
    If,
}

impl TrinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            TrinaryOp::If => "if",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_by_zero() {
        assert_eq!(
            BinaryOp::Div.apply(1.0, 0.0),
            Err(Error::Evaluation(EvaluationError::DivideByZero))
        );
        assert_eq!(BinaryOp::Div.apply(1.0, 4.0), Ok(0.25));
    }

    #[test]
    fn test_log_base() {
        let value = BinaryOp::LogBase.apply(8.0, 2.0).unwrap();
        assert!((value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_trig_uses_degrees() {
        assert!((UnaryOp::Sin.apply(90.0) - 1.0).abs() < 1e-12);
        assert!((UnaryOp::Cos.apply(180.0) + 1.0).abs() < 1e-12);
        assert!((UnaryOp::Tan.apply(45.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_comparison_band() {
        assert!(ComparisonOp::EqEq.test(1.0, 1.00000000001));
        assert!(!ComparisonOp::Lt.test(1.0, 1.00000000001));
        assert!(ComparisonOp::Le.test(1.00000000001, 1.0));
        assert!(ComparisonOp::Lt.test(1.0, 1.001));
        assert!(ComparisonOp::Ne.test(1.0, 1.001));
        assert!(ComparisonOp::LtGt.test(2.0, 1.0));
        assert!(!ComparisonOp::Gt.test(1.0, 1.0));
        assert!(ComparisonOp::Ge.test(1.0, 1.0));
    }

    #[test]
    fn test_comparison_band_large_magnitudes() {
        assert!(ComparisonOp::Eq.test(1e20, 1e20));
        assert!(!ComparisonOp::Lt.test(1e20, 1e20));
    }
}
