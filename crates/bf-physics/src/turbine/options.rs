//! Reading turbine laws and parameters from the input file.

use crate::error::{PhysicsError, PhysicsResult};
use crate::input::InputFile;
use bf_core::{
    AngularVelocity, Density, MomentOfInertia, ensure_finite, kg_m2, kg_per_m3, rad_per_s,
};
use bf_functions::FunctionKind;
use tracing::warn;

/// Text meaning "not configured" for most turbine functions.
pub const ZERO_SENTINEL: &str = "0";

/// Text meaning "not configured" for the angle-of-attack offset, where a
/// literal `0` is a meaningful value.
pub const ABSENT_ANGLE_SENTINEL: &str = "00000";

/// The eight laws that define one turbine.
#[derive(Clone, Debug)]
pub struct TurbineFunctions {
    /// Blade velocity at unit rotor speed, `(x, y, z, t) -> R³`.
    pub base_velocity: FunctionKind,
    /// Local "up" direction of the blade section, `(x, y, z, t) -> R³`.
    pub local_vertical: FunctionKind,
    /// Lift coefficient, `(x, y, z, angle) -> R`.
    pub lift: FunctionKind,
    /// Drag coefficient, `(x, y, z, angle) -> R`.
    pub drag: FunctionKind,
    pub chord_length: FunctionKind,
    pub area_swept: FunctionKind,
    /// Offset added to the geometric angle, `(x, y, z, t) -> R`.
    pub angle_of_attack: FunctionKind,
    /// Output torque drawn from the rotor, `speed -> R`.
    pub torque: FunctionKind,
}

impl TurbineFunctions {
    /// Resolve every law under `section`.
    ///
    /// Missing geometry is fatal. Missing lift, drag or torque laws are
    /// allowed with a warning and evaluate to zero.
    pub fn from_input(section: &str, input: &InputFile) -> PhysicsResult<Self> {
        Ok(Self {
            base_velocity: required(input, section, "base_velocity", ZERO_SENTINEL)?,
            local_vertical: required(input, section, "local_vertical", ZERO_SENTINEL)?,
            lift: optional(input, section, "lift")?,
            drag: optional(input, section, "drag")?,
            chord_length: required(input, section, "chord_length", ZERO_SENTINEL)?,
            area_swept: required(input, section, "area_swept", ZERO_SENTINEL)?,
            angle_of_attack: required(input, section, "angle_of_attack", ABSENT_ANGLE_SENTINEL)?,
            torque: optional(input, section, "torque")?,
        })
    }
}

fn required(
    input: &InputFile,
    section: &str,
    key: &str,
    sentinel: &str,
) -> PhysicsResult<FunctionKind> {
    let path = format!("{section}/{key}");
    match input.function_spec(&path)? {
        Some(spec) if !spec.is_sentinel(sentinel) => Ok(spec.build()?),
        _ => Err(PhysicsError::config(format!("no {key} function specified at '{path}'"))),
    }
}

fn optional(input: &InputFile, section: &str, key: &str) -> PhysicsResult<FunctionKind> {
    let path = format!("{section}/{key}");
    match input.function_spec(&path)? {
        Some(spec) if !spec.is_sentinel(ZERO_SENTINEL) => Ok(spec.build()?),
        _ => {
            warn!(path = %path, "no {key} function specified, using zero");
            Ok(FunctionKind::Zero)
        }
    }
}

/// Scalar parameters of one turbine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurbineParams {
    /// Fluid density shared with the flow solver.
    pub rho: Density,
    pub moment_of_inertia: MomentOfInertia,
    /// Initial rotor speed, consumed by initial-condition setup.
    pub initial_speed: AngularVelocity,
}

impl TurbineParams {
    pub fn from_input(name: &str, section: &str, input: &InputFile) -> PhysicsResult<Self> {
        let params = Self {
            rho: kg_per_m3(input.real("Physics/IncompressibleNavierStokes/rho", 1.0)?),
            moment_of_inertia: kg_m2(input.real(&format!("{section}/moment_of_inertia"), 0.0)?),
            initial_speed: rad_per_s(input.real(&format!("{section}/initial_speed"), 0.0)?),
        };
        params.validate(name)?;
        Ok(params)
    }

    pub fn validate(&self, name: &str) -> PhysicsResult<()> {
        let inertia = self.moment_of_inertia.value;
        if inertia == 0.0 {
            return Err(PhysicsError::ZeroInertia {
                physics: name.to_string(),
            });
        }
        if !inertia.is_finite() || inertia < 0.0 {
            return Err(PhysicsError::config(format!(
                "moment of inertia for '{name}' must be positive, got {inertia}"
            )));
        }
        ensure_finite(self.rho.value, "rho")?;
        ensure_finite(self.initial_speed.value, "initial_speed")?;
        Ok(())
    }
}
