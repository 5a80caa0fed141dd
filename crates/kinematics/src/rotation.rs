use glam::{DQuat, EulerRot};

/* -------------------- Orientation -------------------- */

/// Euler-angle rotation in radians, applied in XYZ order (pitch, yaw, roll).
///
/// Equality and interpolation are both componentwise; no wrapping to
/// `[-pi, pi]` is done, so a rotation keeps the winding it was given.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Rotation {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);
    pub const INVALID: Self = Self::new(f64::NAN, f64::NAN, f64::NAN);

    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }
    pub fn to_quat(&self) -> DQuat {
        DQuat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, self.roll)
    }
    pub fn is_valid(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::ORIGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_identity() {
        let q = Rotation::ORIGIN.to_quat();
        assert!(q.abs_diff_eq(DQuat::IDENTITY, 1e-12));
    }

    #[test]
    fn test_validity() {
        assert!(Rotation::new(0.1, 3.0, -7.0).is_valid());
        assert!(!Rotation::INVALID.is_valid());
        assert!(!Rotation::new(0.0, f64::INFINITY, 0.0).is_valid());
    }

    #[test]
    fn test_yaw_to_quat() {
        let q = Rotation::new(0.0, std::f64::consts::FRAC_PI_2, 0.0).to_quat();
        let expected = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);
        assert!(q.abs_diff_eq(expected, 1e-12));
    }
}
