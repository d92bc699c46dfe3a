//! Error types for function construction.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("Parse error in '{expr}' at offset {pos}: {what}")]
    Parse {
        expr: String,
        pos: usize,
        what: String,
    },

    #[error("Invalid table: {what}")]
    Table { what: &'static str },

    #[error("Invalid function specification: {what}")]
    Spec { what: String },
}

pub type FunctionResult<T> = Result<T, FunctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FunctionError::Parse {
            expr: "x +".into(),
            pos: 3,
            what: "unexpected end of input".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("x +"));
        assert!(msg.contains("offset 3"));
    }
}
