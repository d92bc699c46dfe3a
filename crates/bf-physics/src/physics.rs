//! The contract every physics model implements.

use crate::error::PhysicsResult;
use bf_fem::{AssemblyContext, VariableRegistry};

/// Hooks an outer driver calls to register unknowns and assemble local terms.
///
/// Element hooks may be called concurrently on distinct contexts, so models
/// keep no per-call mutable state. Contributions are added into the
/// context's local residual/Jacobian; nothing is ever overwritten.
pub trait Physics: Send + Sync {
    fn name(&self) -> &str;

    /// Declare the unknowns this model needs. Called once, before assembly.
    fn register_variables(&mut self, registry: &mut VariableRegistry) -> PhysicsResult<()>;

    /// Flag which registered unknowns carry a time derivative.
    fn mark_time_evolving(&self, registry: &mut VariableRegistry) -> PhysicsResult<()>;

    /// Interior contribution to the time-derivative residual of one element.
    fn assemble_element(&self, compute_jacobian: bool, ctx: &mut AssemblyContext) -> PhysicsResult<()> {
        let _ = (compute_jacobian, ctx);
        Ok(())
    }

    /// Contribution to the time-derivative residual of nonlocal (scalar) unknowns.
    fn assemble_nonlocal_time_derivative(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        let _ = (compute_jacobian, ctx);
        Ok(())
    }

    /// Contribution to the mass (inertial) residual of nonlocal unknowns.
    fn assemble_nonlocal_mass_residual(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        let _ = (compute_jacobian, ctx);
        Ok(())
    }
}
