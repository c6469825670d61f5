//! Numeric and logic policy shared by the parser and the evaluator.
//!
//! Values are plain `f64`. Booleans are encoded as `1.0` (true) and `0.0`
//! (false), and every comparison treats values closer than [`EPSILON`] as
//! equal.

use crate::errors::{Error, EvaluationError};

/// Tolerance within which two values compare equal.
pub const EPSILON: f64 = 1e-10;

pub const TRUE: f64 = 1.0;
pub const FALSE: f64 = 0.0;

/// Tolerant equality: `|a - b| < EPSILON`.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

pub fn from_bool(value: bool) -> f64 {
    if value { TRUE } else { FALSE }
}

/// Map a value to a boolean, failing with [`Error::Logic`] for anything that
/// is not within tolerance of 0 or 1.
pub fn to_bool(value: f64) -> Result<bool, Error> {
    if approx_eq(value, TRUE) {
        Ok(true)
    } else if approx_eq(value, FALSE) {
        Ok(false)
    } else {
        Err(Error::Logic { value })
    }
}

/// Reject non-finite results so that domain errors surface explicitly.
pub fn check_finite(value: f64) -> Result<f64, Error> {
    if value.is_nan() {
        Err(EvaluationError::NaN.into())
    } else if value.is_infinite() {
        Err(EvaluationError::Infinity.into())
    } else {
        Ok(value)
    }
}

/// Apply `op` at a given number of decimal places by scaling around it.
fn at_places(value: f64, places: f64, op: fn(f64) -> f64) -> f64 {
    let scale = 10f64.powf(places);
    op(value * scale) / scale
}

pub fn floor_to(value: f64, places: f64) -> f64 {
    at_places(value, places, f64::floor)
}

pub fn ceil_to(value: f64, places: f64) -> f64 {
    at_places(value, places, f64::ceil)
}

/// Round half away from zero at `places` decimal places.
pub fn round_to(value: f64, places: f64) -> f64 {
    at_places(value, places, f64::round)
}
