//! Unknown registration.

use crate::error::{FemError, FemResult};
use bf_core::VarId;

/// How an unknown is represented over an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Spatially varying field interpolated by the element basis.
    Field { order: u32 },
    /// Single-point unknown with exactly one degree of freedom system-wide.
    Scalar,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
    pub time_evolving: bool,
}

/// Registry of unknowns shared by all physics in a system.
///
/// Registering an existing name with the same kind returns the existing id,
/// so several physics can declare the velocity components they share.
#[derive(Clone, Debug)]
pub struct VariableRegistry {
    dim: usize,
    vars: Vec<Variable>,
}

impl VariableRegistry {
    pub fn new(dim: usize) -> FemResult<Self> {
        if !(2..=3).contains(&dim) {
            return Err(FemError::InvalidDimension { dim });
        }
        Ok(Self {
            dim,
            vars: Vec::new(),
        })
    }

    /// Spatial dimension of the mesh the unknowns live on.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn add_field(&mut self, name: &str, order: u32) -> FemResult<VarId> {
        self.add(name, VariableKind::Field { order })
    }

    pub fn add_scalar(&mut self, name: &str) -> FemResult<VarId> {
        self.add(name, VariableKind::Scalar)
    }

    fn add(&mut self, name: &str, kind: VariableKind) -> FemResult<VarId> {
        if let Some(id) = self.var_id(name) {
            return if self.vars[id.index() as usize].kind == kind {
                Ok(id)
            } else {
                Err(FemError::ConflictingVariable {
                    name: name.to_string(),
                })
            };
        }
        let id = VarId::from_index(self.vars.len() as u32);
        self.vars.push(Variable {
            name: name.to_string(),
            kind,
            time_evolving: false,
        });
        Ok(id)
    }

    /// Flag `var` as carrying a time derivative.
    pub fn time_evolving(&mut self, var: VarId) -> FemResult<()> {
        let v = self
            .vars
            .get_mut(var.index() as usize)
            .ok_or(FemError::UnknownVariable { var })?;
        v.time_evolving = true;
        Ok(())
    }

    pub fn is_time_evolving(&self, var: VarId) -> bool {
        self.variable(var).is_ok_and(|v| v.time_evolving)
    }

    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.vars
            .iter()
            .position(|v| v.name == name)
            .map(|i| VarId::from_index(i as u32))
    }

    pub fn variable(&self, var: VarId) -> FemResult<&Variable> {
        self.vars
            .get(var.index() as usize)
            .ok_or(FemError::UnknownVariable { var })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, v)| (VarId::from_index(i as u32), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_dimension() {
        assert!(VariableRegistry::new(1).is_err());
        assert!(VariableRegistry::new(4).is_err());
        assert!(VariableRegistry::new(3).is_ok());
    }

    #[test]
    fn reregistering_returns_same_id() {
        let mut reg = VariableRegistry::new(2).unwrap();
        let u = reg.add_field("u", 2).unwrap();
        let again = reg.add_field("u", 2).unwrap();
        assert_eq!(u, again);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn conflicting_kind_is_rejected() {
        let mut reg = VariableRegistry::new(2).unwrap();
        reg.add_scalar("s").unwrap();
        let err = reg.add_field("s", 1).unwrap_err();
        assert!(matches!(err, FemError::ConflictingVariable { .. }));
    }

    #[test]
    fn time_evolving_flags() {
        let mut reg = VariableRegistry::new(3).unwrap();
        let u = reg.add_field("u", 2).unwrap();
        let s = reg.add_scalar("fan_speed").unwrap();
        reg.time_evolving(s).unwrap();
        assert!(reg.is_time_evolving(s));
        assert!(!reg.is_time_evolving(u));
        assert!(reg.time_evolving(VarId::from_index(9)).is_err());
    }
}
