use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec3;

/* -------------------- Vector -------------------- */

/// Plain 3D value of doubles, used for positions, velocities, accelerations and forces.
///
/// Arithmetic goes through [`DVec3`]; the struct itself only carries the
/// serialized `x`/`y`/`z` layout.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);
    /// Sentinel for "no meaningful value". Never passes [`Vector3::is_valid`].
    pub const INVALID: Self = Self::new(f64::NAN, f64::NAN, f64::NAN);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
    pub fn scale(&self, scalar: f64) -> Self {
        (self.to_dvec3() * scalar).into()
    }
    pub fn length(&self) -> f64 {
        self.to_dvec3().length()
    }
    pub fn distance(&self, other: &Vector3) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// True when every component is finite (no NaN, no infinity).
    pub fn is_valid(&self) -> bool {
        self.to_dvec3().is_finite()
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        v.to_dvec3()
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        (self.to_dvec3() + rhs.to_dvec3()).into()
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        (self.to_dvec3() - rhs.to_dvec3()).into()
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f64) -> Vector3 {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        (-self.to_dvec3()).into()
    }
}
