//! Natural logarithm without a math library
//!
//! The target has no `libm`, so the thermistor converter evaluates `ln(x)`
//! from the series
//!
//! ```text
//! ln(x) = 2 · atanh(t) = 2 · Σ t^(2k+1) / (2k+1),   t = (x - 1) / (x + 1)
//! ```
//!
//! The series converges for every `x > 0`, but slowly once `x` is far from
//! 1: the number of terms grows like `ln(1e-10) / ln(t²)`, and the truncation
//! error after the last term is bounded by `5e-11 · (x + 1)² / x`. For an NTC
//! resistance of 10 kΩ that is about 57 000 terms and an error near 5e-7.
//! [`ln_range_reduced`] first scales `x` into `[1/√2, √2)` by a power of two,
//! where the same series needs fewer than ten terms.

use core::f64::consts::{FRAC_1_SQRT_2, LN_2};

/// The series stops once a term's magnitude drops below this
pub const SERIES_EPSILON: f64 = 1e-10;

/// Logarithm of a non-positive or non-finite value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogDomainError;

fn check_domain(x: f64) -> Result<(), LogDomainError> {
    if x > 0.0 && x.is_finite() {
        Ok(())
    } else {
        Err(LogDomainError)
    }
}

/// `ln(x)` by the atanh series, summed until a term is below [`SERIES_EPSILON`]
///
/// Beyond roughly `1e16` (or below `1e-16`) `t` rounds to `±1` and the
/// terms stop shrinking geometrically; those inputs are evaluated through
/// [`ln_range_reduced`] instead. Inputs short of that are still summed
/// term by term and can take billions of iterations.
pub fn ln_series(x: f64) -> Result<f64, LogDomainError> {
    check_domain(x)?;

    let t = (x - 1.0) / (x + 1.0);
    let t_squared = t * t;
    if t_squared >= 1.0 {
        return ln_range_reduced(x);
    }

    let mut power = t; // t^(2k+1)
    let mut divisor = 1.0; // 2k+1
    let mut sum = 0.0;

    loop {
        let term = power / divisor;
        if term < SERIES_EPSILON && term > -SERIES_EPSILON {
            break;
        }
        sum += term;
        power *= t_squared;
        divisor += 2.0;
    }

    Ok(2.0 * sum)
}

/// `ln(x)` by power-of-two range reduction followed by [`ln_series`]
///
/// Writes `x = m · 2^e` with `m` in `[1/√2, √2)` and returns
/// `ln(m) + e · ln(2)`.
pub fn ln_range_reduced(x: f64) -> Result<f64, LogDomainError> {
    check_domain(x)?;

    let (mut mantissa, mut exponent) = split_exponent(x);
    if mantissa < FRAC_1_SQRT_2 {
        mantissa *= 2.0;
        exponent -= 1;
    }

    Ok(ln_series(mantissa)? + exponent as f64 * LN_2)
}

/// Split a positive finite `x` into `(m, e)` with `x = m · 2^e`, `m` in `[0.5, 1)`
fn split_exponent(x: f64) -> (f64, i32) {
    const EXPONENT_MASK: u64 = 0x7ff << 52;
    const HALF_EXPONENT: u64 = 1022 << 52;
    // 2^54 lifts any subnormal into the normal range
    const SUBNORMAL_SCALE: f64 = 18_014_398_509_481_984.0;

    let mut bits = x.to_bits();
    let mut bias = 0;
    if bits & EXPONENT_MASK == 0 {
        bits = (x * SUBNORMAL_SCALE).to_bits();
        bias = -54;
    }

    let exponent = ((bits & EXPONENT_MASK) >> 52) as i32 - 1022 + bias;
    let mantissa = f64::from_bits((bits & !EXPONENT_MASK) | HALF_EXPONENT);
    (mantissa, exponent)
}

/// Strategy used to evaluate `ln(R)`
#[derive(Debug, Clone, Copy, Default)]
pub enum Logarithm {
    /// Plain atanh series; precise near 1, slow for large resistances
    Series,
    /// Range reduction followed by the series
    #[default]
    RangeReduced,
    /// Caller-provided logarithm, e.g. `f64::ln` or a `libm` routine
    Custom(fn(f64) -> f64),
}

impl Logarithm {
    /// The standard library logarithm
    #[cfg(feature = "std")]
    pub fn platform() -> Self {
        Logarithm::Custom(f64::ln)
    }

    /// Evaluate `ln(x)` with this strategy
    pub fn ln(self, x: f64) -> Result<f64, LogDomainError> {
        match self {
            Logarithm::Series => ln_series(x),
            Logarithm::RangeReduced => ln_range_reduced(x),
            Logarithm::Custom(ln) => {
                check_domain(x)?;
                let value = ln(x);
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(LogDomainError)
                }
            }
        }
    }
}
