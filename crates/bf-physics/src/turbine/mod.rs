//! Averaged turbine: a rotor modelled as a body force on the flow, coupled
//! to a single rotor-speed unknown.
//!
//! The blade is smeared over the swept region. At every point the swept
//! fraction of a blade section exerts lift and drag on the fluid, and the
//! reaction drives the rotor:
//!
//! ```text
//! I ds/dt = -∫ U_B_1 · F dV + τ_out(s)
//! ```

mod blade;
mod element;
mod nonlocal;
mod options;

pub use blade::{BladeElement, BladeElementModel, ForceSensitivity};
pub use options::{ABSENT_ANGLE_SENTINEL, TurbineFunctions, TurbineParams, ZERO_SENTINEL};

use crate::error::{PhysicsError, PhysicsResult};
use crate::flow_vars::{FlowVariableNames, FlowVariables};
use crate::input::InputFile;
use crate::physics::Physics;
use bf_core::{AngularVelocity, VarId};
use bf_fem::{AssemblyContext, VariableRegistry};
use tracing::debug;

/// Default name of the rotor-speed unknown.
pub const FAN_SPEED: &str = "fan_speed";

#[derive(Clone, Debug)]
struct TurbineVariables {
    flow: FlowVariables,
    fan_speed: VarId,
}

#[derive(Clone, Debug)]
pub struct AveragedTurbine {
    name: String,
    functions: TurbineFunctions,
    params: TurbineParams,
    flow_names: FlowVariableNames,
    fan_speed_name: String,
    vars: Option<TurbineVariables>,
}

impl AveragedTurbine {
    pub const KIND: &'static str = "AveragedTurbine";

    /// Build from the `Physics/<name>` section of `input`.
    pub fn new(name: &str, input: &InputFile) -> PhysicsResult<Self> {
        let section = format!("Physics/{name}");
        let functions = TurbineFunctions::from_input(&section, input)?;
        let params = TurbineParams::from_input(name, &section, input)?;
        let flow_names = FlowVariableNames::from_input(input)?;
        let fan_speed_name = input.string("Physics/VariableNames/fan_speed", FAN_SPEED)?;

        debug!(
            physics = name,
            rho = params.rho.value,
            moment_of_inertia = params.moment_of_inertia.value,
            initial_speed = params.initial_speed.value,
            fan_speed = %fan_speed_name,
            "constructed averaged turbine"
        );

        Ok(Self {
            name: name.to_string(),
            functions,
            params,
            flow_names,
            fan_speed_name,
            vars: None,
        })
    }

    /// Build from already-resolved laws, e.g. analytic closures.
    pub fn from_parts(
        name: impl Into<String>,
        functions: TurbineFunctions,
        params: TurbineParams,
    ) -> PhysicsResult<Self> {
        let name = name.into();
        params.validate(&name)?;
        Ok(Self {
            name,
            functions,
            params,
            flow_names: FlowVariableNames::default(),
            fan_speed_name: FAN_SPEED.to_string(),
            vars: None,
        })
    }

    pub fn with_variable_names(mut self, flow: FlowVariableNames, fan_speed: impl Into<String>) -> Self {
        self.flow_names = flow;
        self.fan_speed_name = fan_speed.into();
        self
    }

    pub fn functions(&self) -> &TurbineFunctions {
        &self.functions
    }

    pub fn params(&self) -> &TurbineParams {
        &self.params
    }

    pub fn initial_speed(&self) -> AngularVelocity {
        self.params.initial_speed
    }

    pub fn fan_speed_name(&self) -> &str {
        &self.fan_speed_name
    }

    /// Rotor-speed unknown, once registered.
    pub fn fan_speed_var(&self) -> Option<VarId> {
        self.vars.as_ref().map(|v| v.fan_speed)
    }

    pub fn flow_vars(&self) -> Option<&FlowVariables> {
        self.vars.as_ref().map(|v| &v.flow)
    }

    pub fn blade_model(&self) -> BladeElementModel<'_> {
        BladeElementModel::new(&self.functions, self.params.rho.value)
    }

    fn variables(&self) -> PhysicsResult<&TurbineVariables> {
        self.vars.as_ref().ok_or_else(|| PhysicsError::Uninitialized {
            name: self.name.clone(),
        })
    }
}

impl Physics for AveragedTurbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn register_variables(&mut self, registry: &mut VariableRegistry) -> PhysicsResult<()> {
        let flow = self.flow_names.register(registry)?;
        let fan_speed = registry.add_scalar(&self.fan_speed_name)?;
        debug!(physics = %self.name, dim = registry.dim(), "registered turbine variables");
        self.vars = Some(TurbineVariables { flow, fan_speed });
        Ok(())
    }

    fn mark_time_evolving(&self, registry: &mut VariableRegistry) -> PhysicsResult<()> {
        let vars = self.variables()?;
        registry.time_evolving(vars.fan_speed)?;
        for &var in vars.flow.components() {
            registry.time_evolving(var)?;
        }
        Ok(())
    }

    fn assemble_element(&self, compute_jacobian: bool, ctx: &mut AssemblyContext) -> PhysicsResult<()> {
        self.element_time_derivative(compute_jacobian, ctx)
    }

    fn assemble_nonlocal_time_derivative(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        self.nonlocal_time_derivative(compute_jacobian, ctx)
    }

    fn assemble_nonlocal_mass_residual(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        self.nonlocal_mass_residual(compute_jacobian, ctx)
    }
}
