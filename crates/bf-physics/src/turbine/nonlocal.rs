//! Rotor equation terms that live only on the fan-speed unknown.

use super::AveragedTurbine;
use crate::error::PhysicsResult;
use bf_core::{TORQUE_FD_STEP, central_difference};
use bf_fem::AssemblyContext;
use bf_functions::ScalarFunction;
use nalgebra::Point3;

impl AveragedTurbine {
    /// `F_s += τ_out(s)`; the torque law is evaluated at the origin.
    pub(crate) fn nonlocal_time_derivative(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        let fan_speed = self.variables()?.fan_speed;
        let (data, local) = ctx.split_mut();
        let f_s = data.residual_block(fan_speed)?;
        let speed = data.scalar_value(fan_speed)?;

        let origin = Point3::origin();
        let torque = |s| self.functions.torque.eval(&origin, s);
        local.add_residual(f_s, 0, torque(speed));

        let dsol = data.elem_solution_derivative();
        if compute_jacobian && dsol != 0.0 {
            let k_ss = data.jacobian_block(fan_speed, fan_speed)?;
            let slope = central_difference(torque, speed, TORQUE_FD_STEP);
            local.add_jacobian(k_ss, 0, 0, slope * dsol);
        }
        Ok(())
    }

    /// `F_s += I s`.
    pub(crate) fn nonlocal_mass_residual(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        let fan_speed = self.variables()?.fan_speed;
        let inertia = self.params.moment_of_inertia.value;
        let (data, local) = ctx.split_mut();
        let f_s = data.residual_block(fan_speed)?;
        let speed = data.scalar_value(fan_speed)?;

        local.add_residual(f_s, 0, inertia * speed);

        let dsol = data.elem_solution_derivative();
        if compute_jacobian && dsol != 0.0 {
            let k_ss = data.jacobian_block(fan_speed, fan_speed)?;
            local.add_jacobian(k_ss, 0, 0, inertia * dsol);
        }
        Ok(())
    }
}
