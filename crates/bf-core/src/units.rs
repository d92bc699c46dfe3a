// bf-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, MassDensity as UomMassDensity,
    MomentOfInertia as UomMomentOfInertia,
};

// Rotor parameters carried as SI quantities
pub type AngularVelocity = UomAngularVelocity;
pub type Density = UomMassDensity;
pub type MomentOfInertia = UomMomentOfInertia;

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn kg_m2(v: f64) -> MomentOfInertia {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    MomentOfInertia::new::<kilogram_square_meter>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}
