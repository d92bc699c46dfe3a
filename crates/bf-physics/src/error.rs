//! Error types for physics construction and assembly.

use bf_core::BfError;
use bf_fem::FemError;
use bf_functions::FunctionError;
use thiserror::Error;

/// Errors raised by physics models.
///
/// Configuration problems surface from construction and are fatal; assembly
/// only fails on interface misuse (unregistered variables, wrong context).
#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("Zero moment of inertia specified for '{physics}'")]
    ZeroInertia { physics: String },

    #[error("Unknown physics '{name}'")]
    UnknownPhysics { name: String },

    #[error("Physics '{name}' used before its variables were registered")]
    Uninitialized { name: String },

    #[error("Core error: {0}")]
    Core(#[from] BfError),

    #[error("Function error: {0}")]
    Function(#[from] FunctionError),

    #[error("Assembly error: {0}")]
    Fem(#[from] FemError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

impl PhysicsError {
    pub fn config(what: impl Into<String>) -> Self {
        Self::Config { what: what.into() }
    }
}
