//! Name-keyed construction of physics models.

use crate::error::{PhysicsError, PhysicsResult};
use crate::input::InputFile;
use crate::physics::Physics;
use crate::turbine::AveragedTurbine;
use bf_fem::{AssemblyContext, VariableRegistry};
use std::collections::BTreeMap;
use tracing::info;

/// Closed set of available models.
#[derive(Clone, Debug)]
pub enum PhysicsModel {
    AveragedTurbine(AveragedTurbine),
}

impl PhysicsModel {
    pub fn as_averaged_turbine(&self) -> Option<&AveragedTurbine> {
        match self {
            Self::AveragedTurbine(t) => Some(t),
        }
    }

    fn inner(&self) -> &dyn Physics {
        match self {
            Self::AveragedTurbine(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Physics {
        match self {
            Self::AveragedTurbine(t) => t,
        }
    }
}

impl Physics for PhysicsModel {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn register_variables(&mut self, registry: &mut VariableRegistry) -> PhysicsResult<()> {
        self.inner_mut().register_variables(registry)
    }

    fn mark_time_evolving(&self, registry: &mut VariableRegistry) -> PhysicsResult<()> {
        self.inner().mark_time_evolving(registry)
    }

    fn assemble_element(&self, compute_jacobian: bool, ctx: &mut AssemblyContext) -> PhysicsResult<()> {
        self.inner().assemble_element(compute_jacobian, ctx)
    }

    fn assemble_nonlocal_time_derivative(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        self.inner().assemble_nonlocal_time_derivative(compute_jacobian, ctx)
    }

    fn assemble_nonlocal_mass_residual(
        &self,
        compute_jacobian: bool,
        ctx: &mut AssemblyContext,
    ) -> PhysicsResult<()> {
        self.inner().assemble_nonlocal_mass_residual(compute_jacobian, ctx)
    }
}

/// Builds a model instance named `name` from its input section.
pub type Constructor = fn(name: &str, input: &InputFile) -> PhysicsResult<PhysicsModel>;

fn averaged_turbine(name: &str, input: &InputFile) -> PhysicsResult<PhysicsModel> {
    AveragedTurbine::new(name, input).map(PhysicsModel::AveragedTurbine)
}

/// Maps model kinds to constructors.
///
/// An instance named `N` is configured under `Physics/N`; its kind is
/// `Physics/N/type`, defaulting to `N` itself.
#[derive(Clone, Debug)]
pub struct PhysicsRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl Default for PhysicsRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(AveragedTurbine::KIND, averaged_turbine);
        registry
    }
}

impl PhysicsRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, kind: &str, constructor: Constructor) {
        self.constructors.insert(kind.to_string(), constructor);
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn build(&self, name: &str, input: &InputFile) -> PhysicsResult<PhysicsModel> {
        let kind = input.string(&format!("Physics/{name}/type"), name)?;
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| PhysicsError::UnknownPhysics { name: kind.clone() })?;
        info!(physics = name, kind = %kind, "building physics");
        constructor(name, input)
    }

    /// Build every instance listed in `Physics/enabled_physics`.
    pub fn build_enabled(&self, input: &InputFile) -> PhysicsResult<Vec<PhysicsModel>> {
        input
            .string_list("Physics/enabled_physics")?
            .iter()
            .map(|name| self.build(name, input))
            .collect()
    }
}
