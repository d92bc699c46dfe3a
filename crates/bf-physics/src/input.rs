//! Hierarchical input file.
//!
//! Keys are addressed by slash-separated paths into a YAML document, so
//! `Physics/AveragedTurbine/chord_length` reads
//!
//! ```yaml
//! Physics:
//!   AveragedTurbine:
//!     chord_length: 0.25
//! ```

use crate::error::{PhysicsError, PhysicsResult};
use bf_core::Real;
use bf_functions::FunctionSpec;
use serde_yaml::Value;
use std::path::Path;

#[derive(Clone, Debug, Default)]
pub struct InputFile {
    root: Value,
}

impl InputFile {
    pub fn from_yaml_str(text: &str) -> PhysicsResult<Self> {
        let root: Value = serde_yaml::from_str(text)?;
        Ok(Self { root })
    }

    pub fn from_path(path: impl AsRef<Path>) -> PhysicsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Raw value at `path`, if every segment exists.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('/')
            .filter(|seg| !seg.is_empty())
            .try_fold(&self.root, |node, seg| node.as_mapping()?.get(seg))
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some_and(|v| !v.is_null())
    }

    /// Function spec at `path`; `None` when the key is absent.
    pub fn function_spec(&self, path: &str) -> PhysicsResult<Option<FunctionSpec>> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone())
                .map(Some)
                .map_err(|e| PhysicsError::config(format!("'{path}' is not a function: {e}"))),
        }
    }

    /// Real number at `path`, or `default` when absent. Numeric strings are accepted.
    pub fn real(&self, path: &str, default: Real) -> PhysicsResult<Real> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| PhysicsError::config(format!("'{path}' is not representable as f64"))),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| PhysicsError::config(format!("'{path}' = '{s}' is not a number"))),
            Some(other) => Err(PhysicsError::config(format!(
                "'{path}' expected a number, found {other:?}"
            ))),
        }
    }

    pub fn string(&self, path: &str, default: &str) -> PhysicsResult<String> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(PhysicsError::config(format!(
                "'{path}' expected a string, found {other:?}"
            ))),
        }
    }

    pub fn unsigned(&self, path: &str, default: u32) -> PhysicsResult<u32> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| PhysicsError::config(format!("'{path}' must be a small non-negative integer"))),
            Some(other) => Err(PhysicsError::config(format!(
                "'{path}' expected an integer, found {other:?}"
            ))),
        }
    }

    /// List of strings at `path`. A single string is treated as a one-element list.
    pub fn string_list(&self, path: &str) -> PhysicsResult<Vec<String>> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(s.split_whitespace().map(str::to_string).collect()),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        PhysicsError::config(format!("'{path}' entries must be strings"))
                    })
                })
                .collect(),
            Some(other) => Err(PhysicsError::config(format!(
                "'{path}' expected a list, found {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"
Physics:
  enabled_physics: [AveragedTurbine]
  IncompressibleNavierStokes:
    rho: 1.2
    V_order: 2
  AveragedTurbine:
    base_velocity: "{-y}{x}{0}"
    chord_length: 0.25
    local_vertical: [0, 0, 1]
    moment_of_inertia: "3.5"
"#;

    #[test]
    fn nested_lookup() {
        let input = InputFile::from_yaml_str(INPUT).unwrap();
        assert!(input.has("Physics/AveragedTurbine/chord_length"));
        assert!(!input.has("Physics/AveragedTurbine/lift"));
        assert_eq!(input.real("Physics/IncompressibleNavierStokes/rho", 1.0).unwrap(), 1.2);
        assert_eq!(input.real("Physics/Missing/rho", 1.0).unwrap(), 1.0);
        assert_eq!(input.real("Physics/AveragedTurbine/moment_of_inertia", 0.0).unwrap(), 3.5);
        assert_eq!(input.unsigned("Physics/IncompressibleNavierStokes/V_order", 1).unwrap(), 2);
        assert_eq!(input.string_list("Physics/enabled_physics").unwrap(), vec!["AveragedTurbine"]);
    }

    #[test]
    fn function_specs() {
        let input = InputFile::from_yaml_str(INPUT).unwrap();
        assert_eq!(
            input.function_spec("Physics/AveragedTurbine/base_velocity").unwrap(),
            Some(FunctionSpec::from("{-y}{x}{0}"))
        );
        assert_eq!(
            input.function_spec("Physics/AveragedTurbine/chord_length").unwrap(),
            Some(FunctionSpec::Constant(0.25))
        );
        assert_eq!(
            input.function_spec("Physics/AveragedTurbine/local_vertical").unwrap(),
            Some(FunctionSpec::Vector(vec![0.0, 0.0, 1.0]))
        );
        assert_eq!(input.function_spec("Physics/AveragedTurbine/drag").unwrap(), None);
    }

    #[test]
    fn type_mismatch_is_config_error() {
        let input = InputFile::from_yaml_str(INPUT).unwrap();
        let err = input.real("Physics/AveragedTurbine/base_velocity", 0.0).unwrap_err();
        assert!(matches!(err, PhysicsError::Config { .. }));
        assert!(input.real("Physics/AveragedTurbine", 0.0).is_err());
    }
}
