//! Shape-function and quadrature data for one element.

use crate::error::{FemError, FemResult};
use bf_core::Real;
use nalgebra::{Matrix3, Point3};

/// Basis values and quadrature data, as produced by an upstream FE engine.
///
/// `phi[i][qp]` is basis function `i` at quadrature point `qp`.
/// `dxidx[qp][(k, i)]` is `∂ξ_k/∂x_i` at `qp`; it is optional and only needed
/// by [`crate::StabilizationHelper`].
#[derive(Clone, Debug)]
pub struct ElementFe {
    pub phi: Vec<Vec<Real>>,
    pub jxw: Vec<Real>,
    pub xyz: Vec<Point3<Real>>,
    pub dxidx: Vec<Matrix3<Real>>,
}

impl ElementFe {
    pub fn new(phi: Vec<Vec<Real>>, jxw: Vec<Real>, xyz: Vec<Point3<Real>>) -> FemResult<Self> {
        let n_qp = jxw.len();
        if xyz.len() != n_qp {
            return Err(FemError::ShapeMismatch {
                what: "quadrature points",
                expected: n_qp,
                got: xyz.len(),
            });
        }
        for row in &phi {
            if row.len() != n_qp {
                return Err(FemError::ShapeMismatch {
                    what: "basis function values",
                    expected: n_qp,
                    got: row.len(),
                });
            }
        }
        Ok(Self {
            phi,
            jxw,
            xyz,
            dxidx: Vec::new(),
        })
    }

    /// Attach inverse map derivatives, one matrix per quadrature point.
    pub fn with_inverse_map(mut self, dxidx: Vec<Matrix3<Real>>) -> FemResult<Self> {
        if dxidx.len() != self.n_qpoints() {
            return Err(FemError::ShapeMismatch {
                what: "inverse map",
                expected: self.n_qpoints(),
                got: dxidx.len(),
            });
        }
        self.dxidx = dxidx;
        Ok(self)
    }

    /// Single quadrature point with a single unit basis function.
    pub fn single_point(point: Point3<Real>) -> Self {
        Self {
            phi: vec![vec![1.0]],
            jxw: vec![1.0],
            xyz: vec![point],
            dxidx: Vec::new(),
        }
    }

    pub fn n_qpoints(&self) -> usize {
        self.jxw.len()
    }

    pub fn n_dofs(&self) -> usize {
        self.phi.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_checks() {
        let xyz = vec![Point3::origin(); 2];
        assert!(ElementFe::new(vec![vec![0.5, 0.5]], vec![1.0, 1.0], xyz.clone()).is_ok());
        assert!(ElementFe::new(vec![vec![0.5]], vec![1.0, 1.0], xyz.clone()).is_err());
        assert!(ElementFe::new(vec![], vec![1.0], xyz).is_err());
    }

    #[test]
    fn inverse_map_length_checked() {
        let fe = ElementFe::single_point(Point3::origin());
        assert!(fe.clone().with_inverse_map(vec![]).is_err());
        assert!(fe.with_inverse_map(vec![Matrix3::identity()]).is_ok());
    }
}
