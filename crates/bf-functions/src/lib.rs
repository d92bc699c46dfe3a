//! bf-functions: scalar function objects resolved from configuration text.
//!
//! A function maps a spatial point and one scalar argument (time, angle or
//! rotational speed, depending on the caller) to one or more real values.
//!
//! Variants:
//! - Zero and constant values
//! - Parsed expressions in `x`, `y`, `z`, `t` (vector-valued as `{..}{..}{..}`)
//! - Tables interpolated linearly in the scalar argument
//! - Analytic closures supplied from code
//!
//! # Example
//!
//! ```
//! use bf_functions::{FunctionKind, ScalarFunction};
//! use nalgebra::Point3;
//!
//! let f = FunctionKind::parse("{-y}{x}{0}").unwrap();
//! let mut out = [0.0; 3];
//! f.eval_into(&Point3::new(1.0, 2.0, 0.0), 0.0, &mut out);
//! assert_eq!(out, [-2.0, 1.0, 0.0]);
//! ```

pub mod error;
pub mod expr;
pub mod function;
pub mod spec;
pub mod table;

pub use error::{FunctionError, FunctionResult};
pub use expr::Expr;
pub use function::{AnalyticFn, FunctionKind, ScalarFunction};
pub use spec::FunctionSpec;
pub use table::Table;
