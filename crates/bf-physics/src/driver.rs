//! Assembly passes over many element contexts.
//!
//! Element hooks are independent per context, so a pass may run serially or
//! on the rayon pool. Nonlocal hooks run once per pass on a dedicated context
//! holding the scalar unknowns.

use crate::error::PhysicsResult;
use crate::physics::Physics;
use bf_fem::AssemblyContext;
use rayon::prelude::*;
use tracing::trace;

/// Which residual a pass assembles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    TimeDerivative,
    MassResidual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssemblyRequest {
    pub pass: Pass,
    pub compute_jacobian: bool,
}

impl AssemblyRequest {
    pub fn residual(pass: Pass) -> Self {
        Self {
            pass,
            compute_jacobian: false,
        }
    }

    pub fn jacobian(pass: Pass) -> Self {
        Self {
            pass,
            compute_jacobian: true,
        }
    }
}

fn element_pass<P: Physics>(
    physics: &[P],
    ctx: &mut AssemblyContext,
    request: AssemblyRequest,
) -> PhysicsResult<()> {
    if request.pass != Pass::TimeDerivative {
        return Ok(());
    }
    for p in physics {
        trace!(physics = p.name(), "element time derivative");
        p.assemble_element(request.compute_jacobian, ctx)?;
    }
    Ok(())
}

/// Add element contributions of every model into each context, in order.
pub fn assemble_elements<P: Physics>(
    physics: &[P],
    contexts: &mut [AssemblyContext],
    request: AssemblyRequest,
) -> PhysicsResult<()> {
    contexts
        .iter_mut()
        .try_for_each(|ctx| element_pass(physics, ctx, request))
}

/// Same as [`assemble_elements`], with contexts spread over the rayon pool.
pub fn par_assemble_elements<P: Physics>(
    physics: &[P],
    contexts: &mut [AssemblyContext],
    request: AssemblyRequest,
) -> PhysicsResult<()> {
    contexts
        .par_iter_mut()
        .try_for_each(|ctx| element_pass(physics, ctx, request))
}

/// Add nonlocal contributions of every model into `ctx`.
pub fn assemble_nonlocal<P: Physics>(
    physics: &[P],
    ctx: &mut AssemblyContext,
    request: AssemblyRequest,
) -> PhysicsResult<()> {
    for p in physics {
        trace!(physics = p.name(), pass = ?request.pass, "nonlocal");
        match request.pass {
            Pass::TimeDerivative => {
                p.assemble_nonlocal_time_derivative(request.compute_jacobian, ctx)?
            }
            Pass::MassResidual => p.assemble_nonlocal_mass_residual(request.compute_jacobian, ctx)?,
        }
    }
    Ok(())
}
