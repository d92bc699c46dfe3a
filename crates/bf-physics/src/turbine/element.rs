//! Interior (per-element) assembly of the turbine body force.

use super::AveragedTurbine;
use crate::error::PhysicsResult;
use bf_core::VarId;
use bf_fem::{AssemblyContext, ElementData, FemResult, SubMatrix};
use nalgebra::Vector3;

/// Jacobian blocks touched by the turbine on one element.
struct TurbineBlocks {
    ss: SubMatrix,
    /// `[c]`: fan-speed row, velocity column c
    sv: Vec<SubMatrix>,
    /// `[c]`: velocity row c, fan-speed column
    vs: Vec<SubMatrix>,
    /// `[c][d]`: velocity row c, velocity column d
    vv: Vec<Vec<SubMatrix>>,
}

impl TurbineBlocks {
    fn new(data: &ElementData, velocity: &[VarId], fan_speed: VarId) -> FemResult<Self> {
        Ok(Self {
            ss: data.jacobian_block(fan_speed, fan_speed)?,
            sv: velocity
                .iter()
                .map(|&v| data.jacobian_block(fan_speed, v))
                .collect::<FemResult<_>>()?,
            vs: velocity
                .iter()
                .map(|&v| data.jacobian_block(v, fan_speed))
                .collect::<FemResult<_>>()?,
            vv: velocity
                .iter()
                .map(|&row| {
                    velocity
                        .iter()
                        .map(|&col| data.jacobian_block(row, col))
                        .collect::<FemResult<Vec<_>>>()
                })
                .collect::<FemResult<_>>()?,
        })
    }
}

impl AveragedTurbine {
    /// Body force on the velocity equations and reaction torque on the
    /// fan-speed equation:
    ///
    /// ```text
    /// F_c(i) += F_c φ_i JxW        for each velocity component c
    /// F_s    -= (U_B_1 · F) JxW
    /// ```
    pub(crate) fn element_time_derivative(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        let vars = self.variables()?;
        let fan_speed = vars.fan_speed;
        let (data, local) = ctx.split_mut();
        let dim = data.dim().min(vars.flow.dim());
        let velocity = &vars.flow.components()[..dim];

        let fe = data.fe();
        let n_u_dofs = data.n_dofs(velocity[0])?;
        let f_vel = velocity
            .iter()
            .map(|&v| data.residual_block(v))
            .collect::<FemResult<Vec<_>>>()?;
        let f_s = data.residual_block(fan_speed)?;
        let blocks = if compute_jacobian {
            Some(TurbineBlocks::new(data, velocity, fan_speed)?)
        } else {
            None
        };

        let model = self.blade_model();
        for qp in 0..fe.n_qpoints() {
            let mut u = Vector3::zeros();
            for (c, &var) in velocity.iter().enumerate() {
                u[c] = data.interior_value(var, qp)?;
            }
            let speed = data.interior_value(fan_speed, qp)?;
            let blade = model.evaluate(&fe.xyz[qp], data.time(), &u, speed, compute_jacobian);
            let jxw = fe.jxw[qp];

            local.add_residual(f_s, 0, -blade.torque_density() * jxw);
            for i in 0..n_u_dofs {
                let phi_i = fe.phi[i][qp];
                for (c, &block) in f_vel.iter().enumerate() {
                    local.add_residual(block, i, blade.force[c] * phi_i * jxw);
                }
            }

            let (Some(k), Some(sens)) = (&blocks, &blade.sensitivity) else {
                continue;
            };

            // fan-speed row, once per point
            let ub1 = &blade.base_velocity;
            local.add_jacobian(k.ss, 0, 0, -ub1.dot(&sens.df_ds) * jxw);
            for (d, &block) in k.sv.iter().enumerate() {
                let torque_du = -ub1.dot(&sens.df_du.column(d)) * jxw;
                for j in 0..n_u_dofs {
                    local.add_jacobian(block, 0, j, torque_du * fe.phi[j][qp]);
                }
            }

            for i in 0..n_u_dofs {
                let phi_i_jxw = fe.phi[i][qp] * jxw;
                for c in 0..dim {
                    local.add_jacobian(k.vs[c], i, 0, sens.df_ds[c] * phi_i_jxw);
                    for d in 0..dim {
                        let weight = sens.df_du[(c, d)] * phi_i_jxw;
                        for j in 0..n_u_dofs {
                            local.add_jacobian(k.vv[c][d], i, j, weight * fe.phi[j][qp]);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
