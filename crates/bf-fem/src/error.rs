//! Error types for assembly-context misuse.

use bf_core::VarId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FemError {
    #[error("Unsupported mesh dimension: {dim}")]
    InvalidDimension { dim: usize },

    #[error("Unknown variable {var}")]
    UnknownVariable { var: VarId },

    #[error("Variable '{name}' already registered with a different kind")]
    ConflictingVariable { name: String },

    #[error("Variable {var} is not a scalar unknown")]
    NotScalar { var: VarId },

    #[error("Shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Quadrature point {qp} out of range ({n_qpoints} points)")]
    QpOutOfRange { qp: usize, n_qpoints: usize },

    #[error("Element has no inverse map data")]
    MissingInverseMap,
}

pub type FemResult<T> = Result<T, FemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FemError::ShapeMismatch {
            what: "jxw",
            expected: 4,
            got: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("jxw"));
        assert!(msg.contains("expected 4"));
    }
}
