//! Function objects consumed by physics models.

use crate::error::{FunctionError, FunctionResult};
use crate::expr::{Expr, split_components};
use crate::table::Table;
use bf_core::Real;
use nalgebra::Point3;
use std::fmt;
use std::sync::Arc;

/// Evaluation interface for spatially varying, argument-dependent values.
///
/// The second argument is whatever scalar the caller threads through: time
/// for geometric fields, angle of attack for coefficient laws, rotational
/// speed for torque laws.
///
/// Implementations are immutable after construction and must be safe to
/// share across threads evaluating different elements.
pub trait ScalarFunction: Send + Sync {
    /// Number of components written by [`ScalarFunction::eval_into`].
    fn n_components(&self) -> usize;

    /// Fill `out` with component values. Slots past `n_components` are zeroed.
    fn eval_into(&self, p: &Point3<Real>, arg: Real, out: &mut [Real]);

    /// First component.
    fn eval(&self, p: &Point3<Real>, arg: Real) -> Real {
        let mut out = [0.0];
        self.eval_into(p, arg, &mut out);
        out[0]
    }
}

type AnalyticBody = dyn Fn(&Point3<Real>, Real, &mut [Real]) + Send + Sync;

/// Closure-backed function supplied from code rather than configuration.
#[derive(Clone)]
pub struct AnalyticFn {
    n_components: usize,
    body: Arc<AnalyticBody>,
}

impl AnalyticFn {
    pub fn new<F>(n_components: usize, body: F) -> Self
    where
        F: Fn(&Point3<Real>, Real, &mut [Real]) + Send + Sync + 'static,
    {
        Self {
            n_components,
            body: Arc::new(body),
        }
    }

    /// Scalar closure `f(p, arg)`.
    pub fn scalar<F>(f: F) -> Self
    where
        F: Fn(&Point3<Real>, Real) -> Real + Send + Sync + 'static,
    {
        Self::new(1, move |p, arg, out| {
            if let Some(slot) = out.first_mut() {
                *slot = f(p, arg);
            }
        })
    }
}

impl fmt::Debug for AnalyticFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticFn")
            .field("n_components", &self.n_components)
            .finish_non_exhaustive()
    }
}

/// Closed set of function representations.
#[derive(Clone, Debug)]
pub enum FunctionKind {
    Zero,
    Constant(Vec<Real>),
    Parsed(Vec<Expr>),
    Tabulated(Table),
    Analytic(AnalyticFn),
}

impl FunctionKind {
    /// Parse `expr` or `{expr}{expr}...` into a parsed function.
    pub fn parse(src: &str) -> FunctionResult<Self> {
        let parts = split_components(src)?;
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(FunctionError::Spec {
                what: format!("empty component in '{src}'"),
            });
        }
        let exprs = parts
            .into_iter()
            .map(Expr::parse)
            .collect::<FunctionResult<Vec<_>>>()?;
        Ok(Self::Parsed(exprs))
    }

    pub fn constant(value: Real) -> Self {
        Self::Constant(vec![value])
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Zero)
    }
}

impl ScalarFunction for FunctionKind {
    fn n_components(&self) -> usize {
        match self {
            Self::Zero => 1,
            Self::Constant(values) => values.len(),
            Self::Parsed(exprs) => exprs.len(),
            Self::Tabulated(table) => table.n_components(),
            Self::Analytic(f) => f.n_components,
        }
    }

    fn eval_into(&self, p: &Point3<Real>, arg: Real, out: &mut [Real]) {
        match self {
            Self::Zero => out.fill(0.0),
            Self::Constant(values) => {
                for (c, slot) in out.iter_mut().enumerate() {
                    *slot = values.get(c).copied().unwrap_or(0.0);
                }
            }
            Self::Parsed(exprs) => {
                for (c, slot) in out.iter_mut().enumerate() {
                    *slot = exprs.get(c).map_or(0.0, |e| e.eval(p, arg));
                }
            }
            Self::Tabulated(table) => table.interpolate_into(arg, out),
            Self::Analytic(f) => {
                out.fill(0.0);
                (f.body)(p, arg, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_vector_pads_missing_components() {
        let f = FunctionKind::parse("{x}{y}").unwrap();
        let mut out = [7.0; 3];
        f.eval_into(&Point3::new(1.0, 2.0, 3.0), 0.0, &mut out);
        assert_eq!(out, [1.0, 2.0, 0.0]);
        assert_eq!(f.n_components(), 2);
    }

    #[test]
    fn parsed_scalar_uses_argument_as_t() {
        let f = FunctionKind::parse("2*pi*t").unwrap();
        let v = f.eval(&Point3::origin(), 0.5);
        assert!((v - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn zero_and_constant() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(FunctionKind::Zero.eval(&p, 3.0), 0.0);
        assert_eq!(FunctionKind::constant(1.5).eval(&p, 3.0), 1.5);
        let mut out = [1.0; 3];
        FunctionKind::Constant(vec![0.0, 0.0, 1.0]).eval_into(&p, 0.0, &mut out);
        assert_eq!(out, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn analytic_closure() {
        let f = FunctionKind::Analytic(AnalyticFn::scalar(|p, a| p.x * a));
        assert_eq!(f.eval(&Point3::new(2.0, 0.0, 0.0), 3.0), 6.0);
        let mut out = [5.0; 2];
        f.eval_into(&Point3::new(2.0, 0.0, 0.0), 3.0, &mut out);
        assert_eq!(out, [6.0, 0.0]);
    }

    #[test]
    fn empty_component_rejected() {
        assert!(FunctionKind::parse("{x}{}").is_err());
        assert!(FunctionKind::parse("   ").is_err());
    }

    #[test]
    fn functions_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FunctionKind>();
    }
}
