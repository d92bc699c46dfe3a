#![allow(dead_code)]

use bf_fem::{AssemblyContext, ElementFe, VariableRegistry};
use bf_physics::{AveragedTurbine, InputFile, Physics};
use nalgebra::Point3;

/// Bilinear element on the square `[x0, x0 + h] × [y0, y0 + h]` at height
/// `z`, with 2×2 Gauss quadrature.
pub fn q1_square(x0: f64, y0: f64, h: f64, z: f64) -> ElementFe {
    let g = 1.0 / 3.0_f64.sqrt();
    let qps = [(-g, -g), (g, -g), (g, g), (-g, g)];
    let nodes = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let phi = nodes
        .iter()
        .map(|&(xa, ya)| {
            qps.iter()
                .map(|&(xi, eta)| 0.25 * (1.0 + xa * xi) * (1.0 + ya * eta))
                .collect()
        })
        .collect();
    let jxw = vec![0.25 * h * h; 4];
    let xyz = qps
        .iter()
        .map(|&(xi, eta)| Point3::new(x0 + 0.5 * h * (xi + 1.0), y0 + 0.5 * h * (eta + 1.0), z))
        .collect();
    ElementFe::new(phi, jxw, xyz).unwrap()
}

pub fn turbine_yaml(section: &str) -> String {
    format!("Physics:\n  enabled_physics: [AveragedTurbine]\n  IncompressibleNavierStokes:\n    rho: 1.2\n  AveragedTurbine:\n{section}")
}

pub fn build(yaml: &str, dim: usize) -> (AveragedTurbine, VariableRegistry) {
    let input = InputFile::from_yaml_str(yaml).unwrap();
    let mut turbine = AveragedTurbine::new("AveragedTurbine", &input).unwrap();
    let mut reg = VariableRegistry::new(dim).unwrap();
    turbine.register_variables(&mut reg).unwrap();
    turbine.mark_time_evolving(&mut reg).unwrap();
    (turbine, reg)
}

/// Context with nodal velocities and rotor speed filled in.
pub fn context(
    turbine: &AveragedTurbine,
    reg: &VariableRegistry,
    fe: ElementFe,
    nodal: &[&[f64]],
    speed: f64,
) -> AssemblyContext {
    let mut ctx = AssemblyContext::new(reg, fe);
    let flow = turbine.flow_vars().unwrap();
    for (&var, coeffs) in flow.components().iter().zip(nodal) {
        ctx.set_solution(var, coeffs).unwrap();
    }
    ctx.set_solution(turbine.fan_speed_var().unwrap(), &[speed]).unwrap();
    ctx
}
