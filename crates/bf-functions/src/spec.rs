//! Configuration-side description of a function.

use crate::error::FunctionResult;
use crate::function::FunctionKind;
use crate::table::Table;
use bf_core::Real;
use serde::{Deserialize, Serialize};

/// A function as written in an input file.
///
/// ```yaml
/// lift: "2*pi*t"            # expression
/// base_velocity: "{-y}{x}{0}"
/// chord_length: 0.3         # constant
/// local_vertical: [0, 0, 1] # constant vector
/// drag:
///   table: [[-0.2, 0.02], [0.0, 0.01], [0.2, 0.02]]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionSpec {
    Expression(String),
    Constant(Real),
    Vector(Vec<Real>),
    Table { table: Vec<Vec<Real>> },
}

impl FunctionSpec {
    /// Text form as a GetPot-style reader would see it, if the spec is textual
    /// or a plain number.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Expression(s) => Some(s.trim().to_string()),
            Self::Constant(v) => Some(v.to_string()),
            Self::Vector(_) | Self::Table { .. } => None,
        }
    }

    /// Whether this spec is literally the given sentinel text.
    pub fn is_sentinel(&self, sentinel: &str) -> bool {
        self.as_text().is_some_and(|text| text == sentinel)
    }

    /// Resolve into an evaluable function.
    pub fn build(&self) -> FunctionResult<FunctionKind> {
        match self {
            Self::Expression(src) => FunctionKind::parse(src),
            Self::Constant(v) => Ok(FunctionKind::constant(*v)),
            Self::Vector(values) => Ok(FunctionKind::Constant(values.clone())),
            Self::Table { table } => Ok(FunctionKind::Tabulated(Table::new(table)?)),
        }
    }
}

impl From<&str> for FunctionSpec {
    fn from(s: &str) -> Self {
        Self::Expression(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::ScalarFunction;
    use nalgebra::Point3;

    #[test]
    fn sentinels_compare_as_text() {
        assert!(FunctionSpec::from("0").is_sentinel("0"));
        assert!(FunctionSpec::from(" 0 ").is_sentinel("0"));
        assert!(FunctionSpec::Constant(0.0).is_sentinel("0"));
        assert!(!FunctionSpec::Constant(0.0).is_sentinel("00000"));
        assert!(!FunctionSpec::from("0.0").is_sentinel("0"));
        assert!(!FunctionSpec::Vector(vec![0.0]).is_sentinel("0"));
    }

    #[test]
    fn build_variants() {
        let p = Point3::origin();
        assert_eq!(FunctionSpec::Constant(2.0).build().unwrap().eval(&p, 0.0), 2.0);
        assert_eq!(FunctionSpec::from("t*t").build().unwrap().eval(&p, 3.0), 9.0);
        let table = FunctionSpec::Table {
            table: vec![vec![0.0, 0.0], vec![1.0, 2.0]],
        };
        assert_eq!(table.build().unwrap().eval(&p, 0.25), 0.5);
        assert!(FunctionSpec::from("x +").build().is_err());
    }
}
