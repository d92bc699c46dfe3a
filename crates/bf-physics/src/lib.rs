//! Physics models and the contract an outer multiphysics driver calls.
//!
//! Every model registers its unknowns, flags which evolve in time, and
//! contributes local residuals (and Jacobians on request) through four entry
//! points: element time derivative, nonlocal time derivative and nonlocal
//! mass residual, plus registration.
//!
//! The averaged turbine couples fluid velocity to a rotor speed unknown
//! through a blade-element force model:
//!
//! ```text
//! element:    F_u += F(U, s) φ_i JxW
//!             F_s -= (U_B_1 · F) JxW
//! nonlocal:   F_s += τ_out(s)
//! mass:       F_s += I s
//! ```

pub mod driver;
pub mod error;
pub mod flow_vars;
pub mod input;
pub mod physics;
pub mod registry;
pub mod turbine;

pub use driver::{AssemblyRequest, Pass, assemble_elements, assemble_nonlocal, par_assemble_elements};
pub use error::{PhysicsError, PhysicsResult};
pub use flow_vars::{FlowVariableNames, FlowVariables};
pub use input::InputFile;
pub use physics::Physics;
pub use registry::{PhysicsModel, PhysicsRegistry};
pub use turbine::{AveragedTurbine, BladeElement, BladeElementModel, ForceSensitivity};
