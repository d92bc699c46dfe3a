//! Velocity unknowns shared with the flow solver.

use crate::error::PhysicsResult;
use crate::input::InputFile;
use bf_core::VarId;
use bf_fem::VariableRegistry;

/// Names and finite element order of the velocity components.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowVariableNames {
    pub u: String,
    pub v: String,
    pub w: String,
    pub order: u32,
}

impl Default for FlowVariableNames {
    fn default() -> Self {
        Self {
            u: "u".into(),
            v: "v".into(),
            w: "w".into(),
            order: 2,
        }
    }
}

impl FlowVariableNames {
    /// Reads `Physics/VariableNames/{u,v,w}_velocity` and the velocity order.
    pub fn from_input(input: &InputFile) -> PhysicsResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            u: input.string("Physics/VariableNames/u_velocity", &defaults.u)?,
            v: input.string("Physics/VariableNames/v_velocity", &defaults.v)?,
            w: input.string("Physics/VariableNames/w_velocity", &defaults.w)?,
            order: input.unsigned("Physics/IncompressibleNavierStokes/V_order", defaults.order)?,
        })
    }

    /// Register u, v and, on 3-D meshes, w.
    pub fn register(&self, registry: &mut VariableRegistry) -> PhysicsResult<FlowVariables> {
        let mut components = vec![
            registry.add_field(&self.u, self.order)?,
            registry.add_field(&self.v, self.order)?,
        ];
        if registry.dim() == 3 {
            components.push(registry.add_field(&self.w, self.order)?);
        }
        Ok(FlowVariables { components })
    }
}

/// Registered velocity components, one per spatial dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowVariables {
    components: Vec<VarId>,
}

impl FlowVariables {
    pub fn u(&self) -> VarId {
        self.components[0]
    }

    pub fn v(&self) -> VarId {
        self.components[1]
    }

    pub fn w(&self) -> Option<VarId> {
        self.components.get(2).copied()
    }

    pub fn components(&self) -> &[VarId] {
        &self.components
    }

    pub fn dim(&self) -> usize {
        self.components.len()
    }
}
