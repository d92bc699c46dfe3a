//! bf-core: stable foundation for bladeflow.
//!
//! Contains:
//! - units (uom SI types + constructors for rotor parameters)
//! - numeric (Real + tolerances + finite-difference helpers)
//! - ids (handles of registered unknowns)
//! - error (numeric validation errors)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{BfError, BfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
