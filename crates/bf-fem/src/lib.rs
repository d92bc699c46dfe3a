//! bf-fem: the per-element assembly interface physics models write into.
//!
//! Mesh topology, quadrature and shape-function evaluation happen upstream;
//! this crate only carries their results for one element:
//! - `variables`: registration of spatial fields and single-dof scalar unknowns
//! - `fe`: basis values, quadrature weights, points and inverse map per qp
//! - `context`: DOF layout, local solution and local residual/Jacobian storage
//! - `fd`: finite-difference Jacobians for consistency checks
//! - `stab`: metric helpers used by stabilized formulations

pub mod context;
pub mod error;
pub mod fd;
pub mod fe;
pub mod stab;
pub mod variables;

pub use context::{AssemblyContext, DofLayout, ElementData, LocalSystem, SubMatrix, SubVector};
pub use error::{FemError, FemResult};
pub use fd::{central_difference_jacobian, forward_difference_jacobian};
pub use fe::ElementFe;
pub use stab::StabilizationHelper;
pub use variables::{Variable, VariableKind, VariableRegistry};
