//! Blade-element geometry and force at a single point.
//!
//! Frame: `N_B` points along the blade motion, `N_V` is the local vertical and
//! `N_R = N_B × N_V` runs radially along the blade. The flow seen by the blade
//! section is the local velocity with its radial part removed, minus the
//! blade velocity. Lift acts along `N_drag × N_R`, drag opposes the relative
//! velocity.

use super::options::TurbineFunctions;
use bf_core::{Real, TOLERANCE, central_difference};
use bf_functions::{FunctionKind, ScalarFunction};
use nalgebra::{Matrix3, Point3, Vector3};

/// Everything derived at one point for one velocity and rotor speed.
#[derive(Clone, Debug, PartialEq)]
pub struct BladeElement {
    /// Blade velocity at unit rotor speed (`U_B_1`).
    pub base_velocity: Vector3<Real>,
    /// Blade velocity at the current speed (`U_B`).
    pub blade_velocity: Vector3<Real>,
    pub n_b: Vector3<Real>,
    pub n_v: Vector3<Real>,
    pub n_r: Vector3<Real>,
    /// Velocity relative to the blade section (`U_P`).
    pub relative_velocity: Vector3<Real>,
    pub n_drag: Vector3<Real>,
    pub n_lift: Vector3<Real>,
    pub u_fwd: Real,
    pub u_up: Real,
    /// Geometric angle plus the configured offset.
    pub angle: Real,
    pub c_lift: Real,
    pub c_drag: Real,
    pub chord: Real,
    pub area: Real,
    /// `|U_P|²`
    pub v_sq: Real,
    /// `0.5 ρ chord / area · v²`, zero where no blade passes.
    pub ld_factor: Real,
    pub lift: Real,
    pub drag: Real,
    /// Force per unit volume exerted on the fluid.
    pub force: Vector3<Real>,
    pub sensitivity: Option<ForceSensitivity>,
}

impl BladeElement {
    /// Whether a blade passes through this point at the current speed.
    ///
    /// Points with no swept area carry no blade section either.
    pub fn is_active(&self) -> bool {
        self.blade_velocity.norm_squared() > 0.0 && self.area != 0.0
    }

    /// `U_B_1 · F`, the rotor torque density produced at this point.
    pub fn torque_density(&self) -> Real {
        self.base_velocity.dot(&self.force)
    }
}

/// Derivatives of the point force with respect to the local unknowns.
///
/// Velocity derivatives are per unit change of the local velocity vector;
/// the element assembler multiplies them by the basis function of the dof.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceSensitivity {
    /// `dC_lift/dangle`, by symmetric difference.
    pub d_c_lift: Real,
    pub d_c_drag: Real,
    pub dv2_ds: Real,
    /// `2 (U_P − N_R (U_P·N_R))`
    pub dv2_du: Vector3<Real>,
    pub d_angle_ds: Real,
    pub d_angle_du: Vector3<Real>,
    pub df_ds: Vector3<Real>,
    /// Column `c` is `dF/dU_c`.
    pub df_du: Matrix3<Real>,
}

impl ForceSensitivity {
    fn zero() -> Self {
        Self {
            d_c_lift: 0.0,
            d_c_drag: 0.0,
            dv2_ds: 0.0,
            dv2_du: Vector3::zeros(),
            d_angle_ds: 0.0,
            d_angle_du: Vector3::zeros(),
            df_ds: Vector3::zeros(),
            df_du: Matrix3::zeros(),
        }
    }
}

/// Evaluates [`BladeElement`]s from a turbine's laws and the fluid density.
#[derive(Clone, Copy, Debug)]
pub struct BladeElementModel<'a> {
    functions: &'a TurbineFunctions,
    rho: Real,
}

fn eval_vector(f: &FunctionKind, p: &Point3<Real>, t: Real) -> Vector3<Real> {
    let mut out = [0.0; 3];
    f.eval_into(p, t, &mut out);
    Vector3::from(out)
}

fn unit_or_zero(v: &Vector3<Real>) -> Vector3<Real> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

impl<'a> BladeElementModel<'a> {
    pub fn new(functions: &'a TurbineFunctions, rho: Real) -> Self {
        Self { functions, rho }
    }

    /// Evaluate the blade element at `point` for local `velocity` (w = 0 on
    /// 2-D meshes) and rotor `speed`.
    pub fn evaluate(
        &self,
        point: &Point3<Real>,
        time: Real,
        velocity: &Vector3<Real>,
        speed: Real,
        with_sensitivity: bool,
    ) -> BladeElement {
        let f = self.functions;

        let base_velocity = eval_vector(&f.base_velocity, point, time);
        let blade_velocity = base_velocity * speed;
        let n_b = unit_or_zero(&blade_velocity);
        let n_v = eval_vector(&f.local_vertical, point, time);
        let n_r = n_b.cross(&n_v);

        let relative_velocity = velocity - n_r * velocity.dot(&n_r) - blade_velocity;
        let n_drag = -unit_or_zero(&relative_velocity);
        let n_lift = n_drag.cross(&n_r);

        let u_fwd = -relative_velocity.dot(&n_b);
        let u_up = relative_velocity.dot(&n_v);
        let part_angle = if u_up != 0.0 || u_fwd != 0.0 {
            u_up.atan2(u_fwd)
        } else {
            0.0
        };
        let angle = part_angle + f.angle_of_attack.eval(point, time);

        let c_lift = f.lift.eval(point, angle);
        let c_drag = f.drag.eval(point, angle);
        let chord = f.chord_length.eval(point, time);
        let area = f.area_swept.eval(point, time);

        let v_sq = relative_velocity.norm_squared();
        let active = blade_velocity.norm_squared() > 0.0 && area != 0.0;
        let k = if active { 0.5 * self.rho * chord / area } else { 0.0 };
        let ld_factor = k * v_sq;
        let lift = c_lift * ld_factor;
        let drag = c_drag * ld_factor;
        let force = n_lift * lift + n_drag * drag;

        let mut element = BladeElement {
            base_velocity,
            blade_velocity,
            n_b,
            n_v,
            n_r,
            relative_velocity,
            n_drag,
            n_lift,
            u_fwd,
            u_up,
            angle,
            c_lift,
            c_drag,
            chord,
            area,
            v_sq,
            ld_factor,
            lift,
            drag,
            force,
            sensitivity: None,
        };
        if with_sensitivity {
            element.sensitivity = Some(if active {
                self.sensitivity(point, &element, k)
            } else {
                ForceSensitivity::zero()
            });
        }
        element
    }

    /// Chain rule through `U_P`, which is affine in the unknowns:
    /// `dU_P = (I − N_R N_Rᵀ) dU − U_B_1 ds`.
    ///
    /// With `F = −k |U_P| (C_l U_P×N_R + C_d U_P)`, a change `w` of `U_P`
    /// moves the force through `v²`, through the angle, and by turning the
    /// lift/drag frame with the component of `w` normal to `U_P`.
    fn sensitivity(&self, point: &Point3<Real>, e: &BladeElement, k: Real) -> ForceSensitivity {
        let f = self.functions;
        let d_c_lift = central_difference(|a| f.lift.eval(point, a), e.angle, TOLERANCE);
        let d_c_drag = central_difference(|a| f.drag.eval(point, a), e.angle, TOLERANCE);

        let r_sq = e.u_fwd * e.u_fwd + e.u_up * e.u_up;
        let speed = e.v_sq.sqrt();
        let coeff = e.n_lift * e.c_lift + e.n_drag * e.c_drag;
        let coeff_slope = e.n_lift * d_c_lift + e.n_drag * d_c_drag;

        // (dv², dangle, dF) for a change w of U_P
        let change = |w: Vector3<Real>| -> (Real, Real, Vector3<Real>) {
            let dv2 = 2.0 * e.relative_velocity.dot(&w);
            // angle is undefined at u_fwd = u_up = 0
            let d_angle = if r_sq > 0.0 {
                (e.u_fwd * w.dot(&e.n_v) + e.u_up * w.dot(&e.n_b)) / r_sq
            } else {
                0.0
            };
            let w_normal = w - e.n_drag * e.n_drag.dot(&w);
            let turning = (w_normal.cross(&e.n_r) * e.c_lift + w_normal * e.c_drag) * (-k * speed);
            let df = coeff * (k * dv2) + coeff_slope * (k * e.v_sq * d_angle) + turning;
            (dv2, d_angle, df)
        };

        let (dv2_ds, d_angle_ds, df_ds) = change(-e.base_velocity);

        let projector = Matrix3::identity() - e.n_r * e.n_r.transpose();
        let mut dv2_du = Vector3::zeros();
        let mut d_angle_du = Vector3::zeros();
        let mut df_du = Matrix3::zeros();
        for c in 0..3 {
            let (dv2, d_angle, df) = change(projector.column(c).into_owned());
            dv2_du[c] = dv2;
            d_angle_du[c] = d_angle;
            df_du.set_column(c, &df);
        }

        ForceSensitivity {
            d_c_lift,
            d_c_drag,
            dv2_ds,
            dv2_du,
            d_angle_ds,
            d_angle_du,
            df_ds,
            df_du,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bf_functions::AnalyticFn;
    use proptest::prelude::*;

    fn functions(lift: Real, drag: Real) -> TurbineFunctions {
        TurbineFunctions {
            base_velocity: FunctionKind::Constant(vec![0.0, 1.0, 0.0]),
            local_vertical: FunctionKind::Constant(vec![0.0, 0.0, 1.0]),
            lift: FunctionKind::constant(lift),
            drag: FunctionKind::constant(drag),
            chord_length: FunctionKind::constant(0.5),
            area_swept: FunctionKind::constant(2.0),
            angle_of_attack: FunctionKind::constant(0.0),
            torque: FunctionKind::Zero,
        }
    }

    #[test]
    fn hand_computed_frame_and_force() {
        let f = functions(2.0, 0.4);
        let model = BladeElementModel::new(&f, 1.0);
        let e = model.evaluate(&Point3::origin(), 0.0, &Vector3::new(1.0, 0.0, 0.0), 1.0, false);

        assert_eq!(e.n_b, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(e.n_r, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(e.relative_velocity, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(e.n_drag, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(e.n_lift, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(e.u_fwd, 1.0);
        assert_eq!(e.u_up, 0.0);
        assert_eq!(e.angle, 0.0);
        assert_eq!(e.v_sq, 1.0);
        // k = 0.5 * 1 * 0.5 / 2
        assert!((e.lift - 0.25).abs() < 1e-15);
        assert!((e.drag - 0.05).abs() < 1e-15);
        assert!((e.force - Vector3::new(0.0, 0.05, -0.25)).norm() < 1e-15);
        assert!((e.torque_density() - 0.05).abs() < 1e-15);
        assert!(e.sensitivity.is_none());
    }

    #[test]
    fn stationary_blade_contributes_nothing() {
        let f = functions(2.0, 0.4);
        let model = BladeElementModel::new(&f, 1.0);
        let e = model.evaluate(&Point3::origin(), 0.0, &Vector3::new(3.0, -1.0, 0.5), 0.0, true);

        assert!(!e.is_active());
        assert_eq!(e.n_b, Vector3::zeros());
        assert_eq!(e.force, Vector3::zeros());
        assert_eq!(e.torque_density(), 0.0);
        let s = e.sensitivity.unwrap();
        assert_eq!(s.df_ds, Vector3::zeros());
        assert_eq!(s.df_du, Matrix3::zeros());
    }

    #[test]
    fn zero_swept_area_contributes_nothing() {
        let mut f = functions(2.0, 0.4);
        f.area_swept = FunctionKind::parse("x").unwrap();
        let model = BladeElementModel::new(&f, 1.0);
        let e = model.evaluate(&Point3::origin(), 0.0, &Vector3::new(1.0, 0.0, 0.0), 1.0, true);

        assert!(!e.is_active());
        assert_eq!(e.ld_factor, 0.0);
        assert_eq!(e.force, Vector3::zeros());
        assert_eq!(e.torque_density(), 0.0);
        let s = e.sensitivity.unwrap();
        assert_eq!(s.df_ds, Vector3::zeros());
        assert_eq!(s.df_du, Matrix3::zeros());

        // nonzero area away from the axis
        let e = model.evaluate(&Point3::new(0.5, 0.0, 0.0), 0.0, &Vector3::new(1.0, 0.0, 0.0), 1.0, true);
        assert!(e.is_active());
        assert!(e.force.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn co_moving_flow_falls_back_to_offset_angle() {
        let mut f = functions(2.0, 0.4);
        f.angle_of_attack = FunctionKind::constant(0.3);
        let model = BladeElementModel::new(&f, 1.0);
        // flow moves with the blade: U_P = 0
        let e = model.evaluate(&Point3::origin(), 0.0, &Vector3::new(0.0, 1.0, 0.0), 1.0, true);

        assert_eq!(e.u_fwd, 0.0);
        assert_eq!(e.u_up, 0.0);
        assert_eq!(e.angle, 0.3);
        assert_eq!(e.n_drag, Vector3::zeros());
        assert_eq!(e.force, Vector3::zeros());
        let s = e.sensitivity.unwrap();
        assert!(s.df_du.iter().all(|v| v.is_finite()));
        assert!(s.df_ds.iter().all(|v| v.is_finite()));
        assert_eq!(s.d_angle_ds, 0.0);
    }

    #[test]
    fn coefficient_slopes_by_symmetric_difference() {
        let mut f = functions(0.0, 0.0);
        f.lift = FunctionKind::parse("2*pi*t").unwrap();
        f.drag = FunctionKind::Analytic(AnalyticFn::scalar(|_, a| 0.01 + a * a));
        f.angle_of_attack = FunctionKind::constant(0.2);
        let model = BladeElementModel::new(&f, 1.2);
        let e = model.evaluate(&Point3::origin(), 0.0, &Vector3::new(0.5, 0.0, 0.0), 2.0, true);
        let s = e.sensitivity.unwrap();

        assert!((s.d_c_lift - 2.0 * std::f64::consts::PI).abs() < 1e-6);
        assert!((s.d_c_drag - 2.0 * e.angle).abs() < 1e-6);
    }

    #[test]
    fn velocity_derivatives_match_closed_form() {
        let f = functions(1.0, 0.1);
        let model = BladeElementModel::new(&f, 1.0);
        let e = model.evaluate(
            &Point3::origin(),
            0.0,
            &Vector3::new(0.3, 0.2, 0.4),
            1.5,
            true,
        );
        let s = e.sensitivity.as_ref().unwrap();
        let upnr = e.relative_velocity.dot(&e.n_r);
        let dv2 = (e.relative_velocity - e.n_r * upnr) * 2.0;
        assert!((s.dv2_du - dv2).norm() < 1e-14);
        assert!((s.dv2_ds + 2.0 * e.relative_velocity.dot(&e.base_velocity)).abs() < 1e-14);

        let r_sq = e.u_fwd * e.u_fwd + e.u_up * e.u_up;
        let d_angle = (e.n_v * e.u_fwd + e.n_b * e.u_up) / r_sq;
        assert!((s.d_angle_du - d_angle).norm() < 1e-14);
    }

    /// Central difference of the point force against the analytic sensitivity.
    fn check_point_sensitivity(velocity: Vector3<Real>, speed: Real) {
        let mut f = functions(0.0, 0.0);
        f.base_velocity = FunctionKind::parse("{-y}{x}{0.1}").unwrap();
        f.local_vertical = FunctionKind::Constant(vec![0.0, 0.0, 1.0]);
        f.lift = FunctionKind::parse("5*sin(t)").unwrap();
        f.drag = FunctionKind::parse("0.05 + 0.8*t*t").unwrap();
        f.angle_of_attack = FunctionKind::constant(0.05);
        let model = BladeElementModel::new(&f, 1.1);
        let p = Point3::new(0.4, 0.7, 0.0);
        let e = model.evaluate(&p, 0.0, &velocity, speed, true);
        let s = e.sensitivity.unwrap();
        let h = 1e-6;

        for c in 0..3 {
            let mut plus = velocity;
            plus[c] += h;
            let mut minus = velocity;
            minus[c] -= h;
            let fd = (model.evaluate(&p, 0.0, &plus, speed, false).force
                - model.evaluate(&p, 0.0, &minus, speed, false).force)
                / (2.0 * h);
            assert!((fd - s.df_du.column(c)).norm() < 1e-6 * (1.0 + fd.norm()), "dF/dU_{c}");
        }
        let fd = (model.evaluate(&p, 0.0, &velocity, speed + h, false).force
            - model.evaluate(&p, 0.0, &velocity, speed - h, false).force)
            / (2.0 * h);
        assert!((fd - s.df_ds).norm() < 1e-6 * (1.0 + fd.norm()), "dF/ds");
    }

    #[test]
    fn sensitivity_matches_perturbation() {
        check_point_sensitivity(Vector3::new(1.0, 0.2, -0.3), 1.0);
        check_point_sensitivity(Vector3::new(-0.4, 0.9, 0.6), 2.5);
        check_point_sensitivity(Vector3::new(0.0, 0.0, 0.0), 0.7);
    }

    mod proptests {
        use super::*;

        proptest! {
            #[test]
            fn force_is_always_finite(
                u in -10.0f64..10.0,
                v in -10.0f64..10.0,
                w in -10.0f64..10.0,
                speed in -5.0f64..5.0,
                x in -1.0f64..1.0,
                y in -1.0f64..1.0,
            ) {
                let mut f = functions(1.2, 0.3);
                f.base_velocity = FunctionKind::parse("{-y}{x}{0}").unwrap();
                let model = BladeElementModel::new(&f, 1.0);
                let e = model.evaluate(&Point3::new(x, y, 0.0), 0.0, &Vector3::new(u, v, w), speed, true);
                prop_assert!(e.force.iter().all(|c| c.is_finite()));
                prop_assert!(e.angle.is_finite());
                let s = e.sensitivity.unwrap();
                prop_assert!(s.df_du.iter().all(|c| c.is_finite()));
                prop_assert!(s.df_ds.iter().all(|c| c.is_finite()));
            }

            #[test]
            fn unit_normals_or_zero(bx in -3.0f64..3.0, by in -3.0f64..3.0, speed in -2.0f64..2.0) {
                let mut f = functions(1.0, 0.1);
                f.base_velocity = FunctionKind::Constant(vec![bx, by, 0.0]);
                let model = BladeElementModel::new(&f, 1.0);
                let e = model.evaluate(&Point3::origin(), 0.0, &Vector3::new(0.5, 0.5, 0.0), speed, false);
                let n = e.n_b.norm();
                prop_assert!(n == 0.0 || (n - 1.0).abs() < 1e-12);
                let n = e.n_drag.norm();
                prop_assert!(n == 0.0 || (n - 1.0).abs() < 1e-12);
            }
        }
    }
}
