use crate::rotation::Rotation;
use crate::vector::Vector3;

/// Weighted average between two values of the same kind.
///
/// `ratio == 0.0` returns `self` and `ratio == 1.0` returns `target`, bit for
/// bit, even when the other endpoint is NaN or infinite. Ratios outside
/// `[0, 1]` extrapolate.
pub trait Interpolate {
    fn interpolate(&self, target: &Self, ratio: f64) -> Self;
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    // inf * 0 is NaN, so the endpoints must not go through the blend
    if t == 0.0 {
        a
    } else if t == 1.0 {
        b
    } else {
        a * (1.0 - t) + b * t
    }
}

impl Interpolate for f64 {
    fn interpolate(&self, target: &Self, ratio: f64) -> Self {
        lerp(*self, *target, ratio)
    }
}

impl Interpolate for Vector3 {
    fn interpolate(&self, target: &Self, ratio: f64) -> Self {
        Vector3::new(
            lerp(self.x, target.x, ratio),
            lerp(self.y, target.y, ratio),
            lerp(self.z, target.z, ratio),
        )
    }
}

impl Interpolate for Rotation {
    fn interpolate(&self, target: &Self, ratio: f64) -> Self {
        Rotation::new(
            lerp(self.pitch, target.pitch, ratio),
            lerp(self.yaw, target.yaw, ratio),
            lerp(self.roll, target.roll, ratio),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let a = Vector3::new(0.1, -7.3, 1e9);
        let b = Vector3::new(0.3, 2.2, -4.4e-3);
        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);

        let ra = Rotation::new(0.1, 0.2, 0.3);
        let rb = Rotation::new(-1.7, 2.9, 0.7);
        assert_eq!(ra.interpolate(&rb, 0.0), ra);
        assert_eq!(ra.interpolate(&rb, 1.0), rb);
    }

    #[test]
    fn test_endpoints_survive_non_finite_partner() {
        assert_eq!(2.0_f64.interpolate(&f64::INFINITY, 0.0), 2.0);
        assert_eq!(f64::NEG_INFINITY.interpolate(&-3.0, 1.0), -3.0);
        assert!(2.0_f64.interpolate(&f64::NAN, 0.5).is_nan());
    }

    #[test]
    fn test_midpoint() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(2.0, -4.0, 8.0);
        assert_eq!(a.interpolate(&b, 0.5), Vector3::new(1.0, -2.0, 4.0));
        assert_eq!(1.0_f64.interpolate(&3.0, 0.25), 1.5);
    }

    #[test]
    fn test_no_clamping() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(a.interpolate(&b, 2.0), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(a.interpolate(&b, -1.0), Vector3::new(-1.0, 0.0, 0.0));
    }
}
