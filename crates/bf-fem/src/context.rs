//! Local element storage and solution access.

use crate::error::{FemError, FemResult};
use crate::fe::ElementFe;
use crate::variables::{VariableKind, VariableRegistry};
use bf_core::{Real, VarId};
use nalgebra::{DMatrix, DMatrixView, DVector, DVectorView};

/// Placement of each variable's local dofs in the element vector.
///
/// Field variables get one dof per basis function; scalar variables get one.
#[derive(Clone, Debug)]
pub struct DofLayout {
    blocks: Vec<(VarId, usize, usize)>,
    total: usize,
}

impl DofLayout {
    pub fn new(registry: &VariableRegistry, n_field_dofs: usize) -> Self {
        let mut blocks = Vec::with_capacity(registry.len());
        let mut offset = 0;
        for (id, var) in registry.iter() {
            let count = match var.kind {
                VariableKind::Field { .. } => n_field_dofs,
                VariableKind::Scalar => 1,
            };
            blocks.push((id, offset, count));
            offset += count;
        }
        Self {
            blocks,
            total: offset,
        }
    }

    /// `(offset, count)` for `var`.
    pub fn range(&self, var: VarId) -> FemResult<(usize, usize)> {
        self.blocks
            .iter()
            .find(|(id, _, _)| *id == var)
            .map(|&(_, offset, count)| (offset, count))
            .ok_or(FemError::UnknownVariable { var })
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Handle to one variable's rows of the local residual.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubVector {
    offset: usize,
    len: usize,
}

impl SubVector {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Handle to one (row variable, column variable) block of the local Jacobian.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubMatrix {
    row_offset: usize,
    rows: usize,
    col_offset: usize,
    cols: usize,
}

impl SubMatrix {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Caller-owned local residual and Jacobian for one element.
#[derive(Clone, Debug)]
pub struct LocalSystem {
    pub residual: DVector<Real>,
    pub jacobian: DMatrix<Real>,
}

impl LocalSystem {
    pub fn zeros(n: usize) -> Self {
        Self {
            residual: DVector::zeros(n),
            jacobian: DMatrix::zeros(n, n),
        }
    }

    #[inline]
    pub fn add_residual(&mut self, block: SubVector, i: usize, value: Real) {
        debug_assert!(i < block.len);
        self.residual[block.offset + i] += value;
    }

    #[inline]
    pub fn add_jacobian(&mut self, block: SubMatrix, i: usize, j: usize, value: Real) {
        debug_assert!(i < block.rows && j < block.cols);
        self.jacobian[(block.row_offset + i, block.col_offset + j)] += value;
    }

    pub fn residual_view(&self, block: SubVector) -> DVectorView<'_, Real> {
        self.residual.rows(block.offset, block.len)
    }

    pub fn jacobian_view(&self, block: SubMatrix) -> DMatrixView<'_, Real> {
        self.jacobian
            .view((block.row_offset, block.col_offset), (block.rows, block.cols))
    }

    pub fn fill_zero(&mut self) {
        self.residual.fill(0.0);
        self.jacobian.fill(0.0);
    }
}

/// Read-only element data: FE tables, layout and current local solution.
#[derive(Clone, Debug)]
pub struct ElementData {
    dim: usize,
    time: Real,
    elem_solution_derivative: Real,
    fe: ElementFe,
    layout: DofLayout,
    scalar_vars: Vec<VarId>,
    solution: DVector<Real>,
}

impl ElementData {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn time(&self) -> Real {
        self.time
    }

    /// `∂(local solution)/∂(unknown)` seen by Jacobian terms; 0 disables them.
    pub fn elem_solution_derivative(&self) -> Real {
        self.elem_solution_derivative
    }

    pub fn fe(&self) -> &ElementFe {
        &self.fe
    }

    pub fn layout(&self) -> &DofLayout {
        &self.layout
    }

    pub fn n_dofs(&self, var: VarId) -> FemResult<usize> {
        Ok(self.layout.range(var)?.1)
    }

    pub fn solution(&self) -> &DVector<Real> {
        &self.solution
    }

    pub fn elem_solution(&self, var: VarId) -> FemResult<DVectorView<'_, Real>> {
        let (offset, count) = self.layout.range(var)?;
        Ok(self.solution.rows(offset, count))
    }

    /// Value of `var` at quadrature point `qp`.
    ///
    /// Fields are interpolated as Σ φ_j(qp)·c_j; scalars return their single dof.
    pub fn interior_value(&self, var: VarId, qp: usize) -> FemResult<Real> {
        let n_qpoints = self.fe.n_qpoints();
        if qp >= n_qpoints {
            return Err(FemError::QpOutOfRange { qp, n_qpoints });
        }
        let (offset, count) = self.layout.range(var)?;
        if self.scalar_vars.contains(&var) {
            return Ok(self.solution[offset]);
        }
        Ok((0..count)
            .map(|j| self.fe.phi[j][qp] * self.solution[offset + j])
            .sum())
    }

    /// Value of a scalar unknown.
    pub fn scalar_value(&self, var: VarId) -> FemResult<Real> {
        if !self.scalar_vars.contains(&var) {
            return Err(FemError::NotScalar { var });
        }
        let (offset, _) = self.layout.range(var)?;
        Ok(self.solution[offset])
    }

    pub fn residual_block(&self, var: VarId) -> FemResult<SubVector> {
        let (offset, len) = self.layout.range(var)?;
        Ok(SubVector { offset, len })
    }

    pub fn jacobian_block(&self, row: VarId, col: VarId) -> FemResult<SubMatrix> {
        let (row_offset, rows) = self.layout.range(row)?;
        let (col_offset, cols) = self.layout.range(col)?;
        Ok(SubMatrix {
            row_offset,
            rows,
            col_offset,
            cols,
        })
    }
}

/// Everything a physics model sees for one element and one assembly pass.
#[derive(Clone, Debug)]
pub struct AssemblyContext {
    data: ElementData,
    local: LocalSystem,
}

impl AssemblyContext {
    pub fn new(registry: &VariableRegistry, fe: ElementFe) -> Self {
        let layout = DofLayout::new(registry, fe.n_dofs());
        let scalar_vars = registry
            .iter()
            .filter(|(_, v)| v.kind == VariableKind::Scalar)
            .map(|(id, _)| id)
            .collect();
        let n = layout.total();
        Self {
            data: ElementData {
                dim: registry.dim(),
                time: 0.0,
                elem_solution_derivative: 1.0,
                fe,
                layout,
                scalar_vars,
                solution: DVector::zeros(n),
            },
            local: LocalSystem::zeros(n),
        }
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    pub fn local(&self) -> &LocalSystem {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut LocalSystem {
        &mut self.local
    }

    /// Read element data while writing local contributions.
    pub fn split_mut(&mut self) -> (&ElementData, &mut LocalSystem) {
        (&self.data, &mut self.local)
    }

    pub fn set_time(&mut self, time: Real) {
        self.data.time = time;
    }

    pub fn set_elem_solution_derivative(&mut self, value: Real) {
        self.data.elem_solution_derivative = value;
    }

    /// Overwrite the local coefficients of `var`.
    pub fn set_solution(&mut self, var: VarId, coeffs: &[Real]) -> FemResult<()> {
        let (offset, count) = self.data.layout.range(var)?;
        if coeffs.len() != count {
            return Err(FemError::ShapeMismatch {
                what: "solution coefficients",
                expected: count,
                got: coeffs.len(),
            });
        }
        self.data
            .solution
            .rows_mut(offset, count)
            .copy_from_slice(coeffs);
        Ok(())
    }

    /// Overwrite the full local solution vector.
    pub fn set_solution_vector(&mut self, solution: &DVector<Real>) -> FemResult<()> {
        if solution.len() != self.data.solution.len() {
            return Err(FemError::ShapeMismatch {
                what: "local solution",
                expected: self.data.solution.len(),
                got: solution.len(),
            });
        }
        self.data.solution.copy_from(solution);
        Ok(())
    }

    pub fn residual(&self, var: VarId) -> FemResult<DVectorView<'_, Real>> {
        Ok(self.local.residual_view(self.data.residual_block(var)?))
    }

    pub fn jacobian(&self, row: VarId, col: VarId) -> FemResult<DMatrixView<'_, Real>> {
        Ok(self.local.jacobian_view(self.data.jacobian_block(row, col)?))
    }

    pub fn zero_local(&mut self) {
        self.local.fill_zero();
    }
}
