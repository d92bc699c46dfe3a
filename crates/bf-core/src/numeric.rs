use crate::BfError;

/// Floating point type used throughout the system
pub type Real = f64;

/// Step used for symmetric differencing of aerodynamic coefficient laws.
pub const TOLERANCE: Real = 1e-8;

/// Step used for symmetric differencing of the output torque law.
pub const TORQUE_FD_STEP: Real = 1e-6;

#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, BfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BfError::NonFinite { what, value: v })
    }
}

/// Symmetric difference `(f(x+h) - f(x-h)) / 2h`.
///
/// Truncation error is O(h²) for smooth `f`.
#[inline]
pub fn central_difference<F>(f: F, x: Real, h: Real) -> Real
where
    F: Fn(Real) -> Real,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}
