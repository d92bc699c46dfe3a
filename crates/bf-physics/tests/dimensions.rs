mod common;

use bf_physics::{AveragedTurbine, Physics};
use common::{build, context, q1_square, turbine_yaml};

// Blade moving along y with the vertical along x, so the rotor axis is
// normal to the mesh plane and the force stays in-plane.
const IN_PLANE: &str = r#"    base_velocity: "{0}{1 + 0.5*x}{0}"
    local_vertical: [1, 0, 0]
    lift: "1.5*t + 0.2"
    drag: "0.02 + 0.3*t*t"
    chord_length: 0.25
    area_swept: 0.8
    angle_of_attack: 0.02
    moment_of_inertia: 1.0
"#;

const U: [f64; 4] = [0.9, 1.1, 1.0, 0.7];
const V: [f64; 4] = [-0.2, 0.1, 0.3, 0.0];
const ZERO: [f64; 4] = [0.0; 4];

fn assembled(dim: usize) -> (AveragedTurbine, bf_fem::AssemblyContext) {
    let (turbine, reg) = build(&turbine_yaml(IN_PLANE), dim);
    let nodal: Vec<&[f64]> = if dim == 3 { vec![&U[..], &V[..], &ZERO[..]] } else { vec![&U[..], &V[..]] };
    let mut ctx = context(&turbine, &reg, q1_square(0.0, 0.0, 0.5, 0.0), &nodal, 1.3);
    turbine.assemble_element(true, &mut ctx).unwrap();
    (turbine, ctx)
}

#[test]
fn three_d_with_zero_w_matches_two_d() {
    let (t2, c2) = assembled(2);
    let (t3, c3) = assembled(3);
    let f2 = t2.flow_vars().unwrap();
    let f3 = t3.flow_vars().unwrap();
    let s2 = t2.fan_speed_var().unwrap();
    let s3 = t3.fan_speed_var().unwrap();

    let pairs = [(f2.u(), f3.u()), (f2.v(), f3.v()), (s2, s3)];
    for &(a, b) in &pairs {
        let diff = c2.residual(a).unwrap() - c3.residual(b).unwrap();
        assert!(diff.amax() < 1e-14);
        for &(ca, cb) in &pairs {
            let diff = c2.jacobian(a, ca).unwrap() - c3.jacobian(b, cb).unwrap();
            assert!(diff.amax() < 1e-14);
        }
    }
    assert!(c2.residual(f2.v()).unwrap().amax() > 0.0);
}

#[test]
fn w_blocks_vanish_for_in_plane_rotor() {
    let (t3, c3) = assembled(3);
    let flow = t3.flow_vars().unwrap();
    let w = flow.w().unwrap();
    let s = t3.fan_speed_var().unwrap();

    assert_eq!(c3.residual(w).unwrap().amax(), 0.0);
    for other in [flow.u(), flow.v(), w, s] {
        assert_eq!(c3.jacobian(w, other).unwrap().amax(), 0.0);
        assert_eq!(c3.jacobian(other, w).unwrap().amax(), 0.0);
    }
}

#[test]
fn two_d_registers_no_w() {
    let (t2, c2) = assembled(2);
    assert!(t2.flow_vars().unwrap().w().is_none());
    // u, v on four nodes plus the rotor speed
    assert_eq!(c2.data().layout().total(), 9);
}
