//! Finite-difference Jacobians of local residual maps.
//!
//! Used to check hand-derived element Jacobians against the residual they
//! differentiate. Steps are relative, `h_j = eps · max(|x_j|, 1)`, and the
//! residual closure's error type passes through unchanged.

use bf_core::Real;
use nalgebra::{DMatrix, DVector};

#[inline]
fn step(eps: Real, x: Real) -> Real {
    eps * x.abs().max(1.0)
}

/// One-sided differences: column j is `(f(x + h_j e_j) − f(x)) / h_j`.
pub fn forward_difference_jacobian<F, E>(x: &DVector<Real>, mut f: F, eps: Real) -> Result<DMatrix<Real>, E>
where
    F: FnMut(&DVector<Real>) -> Result<DVector<Real>, E>,
{
    let base = f(x)?;
    let mut jac = DMatrix::zeros(base.len(), x.len());
    let mut probe = x.clone();
    for j in 0..x.len() {
        let h = step(eps, x[j]);
        probe[j] = x[j] + h;
        let column = (f(&probe)? - &base) / h;
        probe[j] = x[j];
        jac.set_column(j, &column);
    }
    Ok(jac)
}

/// Symmetric differences, O(h²) accurate: column j is
/// `(f(x + h_j e_j) − f(x − h_j e_j)) / 2h_j`.
pub fn central_difference_jacobian<F, E>(x: &DVector<Real>, mut f: F, eps: Real) -> Result<DMatrix<Real>, E>
where
    F: FnMut(&DVector<Real>) -> Result<DVector<Real>, E>,
{
    let rows = f(x)?.len();
    let mut jac = DMatrix::zeros(rows, x.len());
    let mut probe = x.clone();
    for j in 0..x.len() {
        let h = step(eps, x[j]);
        probe[j] = x[j] + h;
        let plus = f(&probe)?;
        probe[j] = x[j] - h;
        let minus = f(&probe)?;
        probe[j] = x[j];
        jac.set_column(j, &((plus - minus) / (2.0 * h)));
    }
    Ok(jac)
}
