//! Element metric quantities for stabilized formulations.
//!
//! With `dxidx[(k, i)] = ∂ξ_k/∂x_i`:
//!
//! ```text
//! g_i  = Σ_k ∂ξ_k/∂x_i
//! G_ij = Σ_k ∂ξ_k/∂x_i ∂ξ_k/∂x_j
//! ```
//!
//! Sums run over the mesh dimension only; unused entries stay zero.

use crate::error::{FemError, FemResult};
use crate::fe::ElementFe;
use bf_core::Real;
use nalgebra::{Matrix3, Vector3};

#[derive(Clone, Copy, Debug, Default)]
pub struct StabilizationHelper;

impl StabilizationHelper {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_g(&self, fe: &ElementFe, dim: usize, qp: usize) -> FemResult<Vector3<Real>> {
        let map = inverse_map(fe, qp)?;
        let mut g = Vector3::zeros();
        for i in 0..dim {
            g[i] = (0..dim).map(|k| map[(k, i)]).sum();
        }
        Ok(g)
    }

    #[allow(non_snake_case)]
    pub fn compute_G(&self, fe: &ElementFe, dim: usize, qp: usize) -> FemResult<Matrix3<Real>> {
        let map = inverse_map(fe, qp)?;
        let mut big_g = Matrix3::zeros();
        for i in 0..dim {
            for j in 0..dim {
                big_g[(i, j)] = (0..dim).map(|k| map[(k, i)] * map[(k, j)]).sum();
            }
        }
        Ok(big_g)
    }
}

fn inverse_map(fe: &ElementFe, qp: usize) -> FemResult<&Matrix3<Real>> {
    if fe.dxidx.is_empty() {
        return Err(FemError::MissingInverseMap);
    }
    fe.dxidx.get(qp).ok_or(FemError::QpOutOfRange {
        qp,
        n_qpoints: fe.n_qpoints(),
    })
}
