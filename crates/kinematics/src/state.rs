use crate::error::{KinematicsError, Result};
use crate::interpolate::Interpolate;
use crate::policy::{IntegrationPolicy, PositionGuard};
use crate::rotation::Rotation;
use crate::vector::Vector3;

/* -------------------- Initial state -------------------- */

/// Construction options for a [`KinematicState`]. Every field defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub position: Vector3,
    pub rotation: Rotation,
    pub velocity: Vector3,
    pub acceleration: Vector3,
    pub mass: f64,
}

/* -------------------- Kinematic state -------------------- */

/// Position, rotation, velocity and constant acceleration of one point-like body,
/// plus the pose from before the last mutation so renders can interpolate.
///
/// `previous_position` / `previous_rotation` are only ever written by caching
/// the current value right before [`update`](Self::update),
/// [`set_position`](Self::set_position) or [`set_rotation`](Self::set_rotation)
/// overwrite it.
///
/// The serialized field names are part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KinematicState {
    previous_position: Vector3,
    position: Vector3,
    previous_rotation: Rotation,
    rotation: Rotation,
    velocity: Vector3,
    acceleration: Vector3,
    mass: f64,
}

impl KinematicState {
    /// Zero pose, zero motion, zero mass.
    pub const ORIGIN: Self = Self {
        previous_position: Vector3::ORIGIN,
        position: Vector3::ORIGIN,
        previous_rotation: Rotation::ORIGIN,
        rotation: Rotation::ORIGIN,
        velocity: Vector3::ORIGIN,
        acceleration: Vector3::ORIGIN,
        mass: 0.0,
    };

    pub fn new(position: Vector3) -> Self {
        Self {
            previous_position: position,
            position,
            ..Self::ORIGIN
        }
    }

    pub fn from_initial(initial: InitialState) -> Self {
        Self::new(initial.position)
            .with_rotation(initial.rotation)
            .with_velocity(initial.velocity)
            .with_acceleration(initial.acceleration)
            .with_mass(initial.mass)
    }

    /// Sets the starting rotation. Both the current and previous rotation take
    /// the value so the first render does not sweep from the origin.
    #[inline]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.previous_rotation = rotation;
        self.rotation = rotation;
        self
    }
    #[inline]
    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }
    #[inline]
    pub fn with_acceleration(mut self, acceleration: Vector3) -> Self {
        self.acceleration = acceleration;
        self
    }
    #[inline]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /* ---------- simulation ---------- */

    /// Advances the state by `delta_time`.
    ///
    /// Position moves with the velocity from *before* this call; the velocity
    /// then picks up `acceleration * delta_time`, unless either vector is
    /// invalid, in which case it is left alone. Position integration is not
    /// guarded (see [`update_with`](Self::update_with) for the guarded form).
    pub fn update(&mut self, delta_time: f64) {
        self.update_with(delta_time, &IntegrationPolicy::default());
    }

    pub fn update_with(&mut self, delta_time: f64, policy: &IntegrationPolicy) {
        self.previous_position = self.position;
        self.previous_rotation = self.rotation;

        let skip_position = policy.position_guard == PositionGuard::SkipInvalidVelocity
            && !self.velocity.is_valid();
        if !skip_position {
            self.position = self.position + self.velocity.scale(delta_time);
        }

        if self.velocity.is_valid() && self.acceleration.is_valid() {
            self.velocity = self.velocity + self.acceleration.scale(delta_time);
        } else {
            tracing::trace!(
                velocity = ?self.velocity,
                acceleration = ?self.acceleration,
                "skipping velocity integration on invalid data"
            );
        }
    }

    /// Integrates `force / mass` into the velocity over `delta_time`.
    ///
    /// The stored acceleration is not touched. A zero mass yields a non-finite
    /// velocity which is kept as is; use [`try_apply_force`](Self::try_apply_force)
    /// to have it rejected instead.
    pub fn apply_force(&mut self, force: Vector3, delta_time: f64) {
        self.velocity = self.velocity + force.scale(delta_time / self.mass);
        if !self.velocity.is_valid() {
            tracing::warn!(
                mass = self.mass,
                velocity = ?self.velocity,
                "force application left a non-finite velocity"
            );
        }
    }

    /// Same rule as [`apply_force`](Self::apply_force), but refuses to leave the
    /// state degenerate. On error nothing is modified.
    pub fn try_apply_force(&mut self, force: Vector3, delta_time: f64) -> Result<()> {
        if self.mass == 0.0 || !self.mass.is_finite() {
            return Err(KinematicsError::DegenerateMass { mass: self.mass });
        }
        let velocity = self.velocity + force.scale(delta_time / self.mass);
        if !velocity.is_valid() {
            return Err(KinematicsError::NonFiniteVelocity { velocity });
        }
        self.velocity = velocity;
        Ok(())
    }

    /* ---------- rendering ---------- */

    pub fn render_position(&self, ratio: f64) -> Vector3 {
        self.previous_position.interpolate(&self.position, ratio)
    }
    pub fn render_rotation(&self, ratio: f64) -> Rotation {
        self.previous_rotation.interpolate(&self.rotation, ratio)
    }

    /* ---------- accessors ---------- */

    /// Teleports to `position`. The old position becomes the interpolation
    /// baseline, so the next renders snap across within one tick.
    pub fn set_position(&mut self, position: Vector3) {
        self.previous_position = self.position;
        self.position = position;
    }
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.previous_rotation = self.rotation;
        self.rotation = rotation;
    }
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }
    pub fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }
    pub fn previous_position(&self) -> Vector3 {
        self.previous_position
    }
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
    pub fn previous_rotation(&self) -> Rotation {
        self.previous_rotation
    }
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }
    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// True when no field holds NaN or infinity.
    pub fn is_valid(&self) -> bool {
        self.previous_position.is_valid()
            && self.position.is_valid()
            && self.previous_rotation.is_valid()
            && self.rotation.is_valid()
            && self.velocity.is_valid()
            && self.acceleration.is_valid()
            && self.mass.is_finite()
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::ORIGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving() -> KinematicState {
        KinematicState::new(Vector3::new(0.0, 0.0, 0.0))
            .with_velocity(Vector3::new(1.0, 0.0, 0.0))
            .with_acceleration(Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_origin() {
        let s = KinematicState::ORIGIN;
        assert_eq!(s.position(), Vector3::ORIGIN);
        assert_eq!(s.previous_position(), Vector3::ORIGIN);
        assert_eq!(s.rotation(), Rotation::ORIGIN);
        assert_eq!(s.velocity(), Vector3::ORIGIN);
        assert_eq!(s.acceleration(), Vector3::ORIGIN);
        assert_eq!(s.mass(), 0.0);
        assert_eq!(KinematicState::default(), KinematicState::ORIGIN);
    }

    #[test]
    fn test_construction_baseline() {
        let p = Vector3::new(3.0, -2.0, 7.5);
        let r = Rotation::new(0.3, 0.2, 0.1);
        let s = KinematicState::new(p).with_rotation(r);
        assert_eq!(s.previous_position(), s.position());
        assert_eq!(s.previous_rotation(), s.rotation());
        for ratio in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(s.render_position(ratio), p);
            assert_eq!(s.render_rotation(ratio), r);
        }
    }

    #[test]
    fn test_from_initial_defaults() {
        let s = KinematicState::from_initial(InitialState {
            position: Vector3::new(1.0, 2.0, 3.0),
            ..Default::default()
        });
        assert_eq!(s.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(s.previous_position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(s.rotation(), Rotation::ORIGIN);
        assert_eq!(s.velocity(), Vector3::ORIGIN);
        assert_eq!(s.acceleration(), Vector3::ORIGIN);
        assert_eq!(s.mass(), 0.0);
    }

    #[test]
    fn test_two_tick_scenario() {
        let mut s = moving();

        s.update(1.0);
        assert_eq!(s.position(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(s.velocity(), Vector3::new(1.0, -1.0, 0.0));
        assert_eq!(s.previous_position(), Vector3::new(0.0, 0.0, 0.0));

        s.update(1.0);
        assert_eq!(s.position(), Vector3::new(2.0, -1.0, 0.0));
        assert_eq!(s.velocity(), Vector3::new(1.0, -2.0, 0.0));
        assert_eq!(s.previous_position(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_update_caches_previous_pose() {
        let mut s = moving();
        s.set_rotation(Rotation::new(0.5, 0.0, 0.0));
        let old_position = s.position();
        let old_velocity = s.velocity();
        let old_rotation = s.rotation();

        s.update(0.25);
        assert_eq!(s.previous_position(), old_position);
        assert_eq!(s.previous_rotation(), old_rotation);
        assert_eq!(s.position(), old_position + old_velocity * 0.25);
    }

    #[test]
    fn test_invalid_acceleration_leaves_velocity() {
        let mut s = moving().with_acceleration(Vector3::new(0.0, f64::NAN, 0.0));
        s.update(1.0);
        assert_eq!(s.velocity(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(s.position(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_valid_acceleration_integrates_exactly() {
        let mut s = KinematicState::new(Vector3::ORIGIN)
            .with_velocity(Vector3::new(0.5, 1.5, -2.0))
            .with_acceleration(Vector3::new(0.0, -9.81, 0.25));
        let dt = 1.0 / 60.0;
        let expected = s.velocity() + s.acceleration() * dt;
        s.update(dt);
        assert_eq!(s.velocity(), expected);
    }

    #[test]
    fn test_invalid_velocity_still_moves_position_by_default() {
        let mut s = KinematicState::new(Vector3::ORIGIN).with_velocity(Vector3::INVALID);
        s.update(1.0);
        assert!(!s.position().is_valid());
        assert!(!s.velocity().is_valid());
        assert_eq!(s.previous_position(), Vector3::ORIGIN);
    }

    #[test]
    fn test_guarded_policy_keeps_position() {
        let mut s = KinematicState::new(Vector3::new(4.0, 0.0, 0.0))
            .with_velocity(Vector3::new(f64::INFINITY, 0.0, 0.0));
        s.update_with(1.0, &IntegrationPolicy::guarded());
        assert_eq!(s.position(), Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(s.previous_position(), Vector3::new(4.0, 0.0, 0.0));

        // valid velocity integrates normally under the guard
        let mut t = moving();
        t.update_with(1.0, &IntegrationPolicy::guarded());
        assert_eq!(t.position(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_teleport_snaps() {
        let mut s = KinematicState::new(Vector3::new(1.0, 1.0, 1.0));
        let q = Vector3::new(-10.0, 20.0, 0.5);
        s.set_position(q);
        assert_eq!(s.render_position(0.0), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(s.render_position(1.0), q);

        let r = Rotation::new(1.0, 2.0, 3.0);
        s.set_rotation(r);
        assert_eq!(s.render_rotation(0.0), Rotation::ORIGIN);
        assert_eq!(s.render_rotation(1.0), r);
    }

    #[test]
    fn test_render_endpoints_after_motion() {
        let mut s = moving().with_rotation(Rotation::new(0.1, 0.0, 0.0));
        s.update(0.3);
        s.set_rotation(Rotation::new(0.7, -0.2, 0.05));
        s.update(0.3);
        assert_eq!(s.render_position(0.0), s.previous_position());
        assert_eq!(s.render_position(1.0), s.position());
        assert_eq!(s.render_rotation(0.0), s.previous_rotation());
        assert_eq!(s.render_rotation(1.0), s.rotation());
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut s = moving();
        s.update(1.0);
        let first = s.render_position(0.37);
        for _ in 0..10 {
            assert_eq!(s.render_position(0.37), first);
        }
        assert_eq!(s.render_position(0.5), Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_apply_force() {
        let mut s = KinematicState::new(Vector3::ORIGIN)
            .with_velocity(Vector3::new(1.0, 2.0, 3.0))
            .with_acceleration(Vector3::new(0.0, -9.81, 0.0))
            .with_mass(4.0);
        let force = Vector3::new(8.0, 0.0, -4.0);
        let expected = s.velocity() + force * (0.5 / 4.0);
        s.apply_force(force, 0.5);
        assert_eq!(s.velocity(), expected);
        assert_eq!(s.velocity(), Vector3::new(2.0, 2.0, 2.5));
        assert_eq!(s.acceleration(), Vector3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn test_apply_force_zero_mass_propagates() {
        let mut s = moving();
        s.apply_force(Vector3::new(1.0, 1.0, 1.0), 1.0);
        assert!(!s.velocity().is_valid());
        assert!(!s.is_valid());

        // the guard stops acceleration from being added, but nothing is repaired
        let poisoned = s.velocity();
        s.update(1.0);
        assert!(!s.velocity().is_valid());
        assert_eq!(s.velocity(), poisoned);
    }

    #[test]
    fn test_render_keeps_last_good_pose_after_invalid_velocity() {
        let mut s = KinematicState::new(Vector3::new(1.0, 2.0, 3.0)).with_velocity(Vector3::INVALID);
        s.update(1.0);
        assert!(!s.position().is_valid());
        assert_eq!(s.render_position(0.0), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(s.render_position(0.0), s.previous_position());

        let mut t = KinematicState::new(Vector3::INVALID);
        t.set_position(Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(t.render_position(1.0), Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_render_after_zero_mass_force() {
        let mut s = moving();
        s.apply_force(Vector3::new(1.0, 1.0, 1.0), 1.0);
        s.update(1.0);
        assert_eq!(s.render_position(0.0), Vector3::ORIGIN);
        assert_eq!(s.render_rotation(1.0), Rotation::ORIGIN);
    }

    #[test]
    fn test_try_apply_force_rejects_degenerate_mass() {
        let mut s = moving();
        let before = s;
        let err = s.try_apply_force(Vector3::new(1.0, 0.0, 0.0), 1.0);
        assert!(matches!(err, Err(KinematicsError::DegenerateMass { .. })));
        assert_eq!(s, before);

        s.set_mass(f64::NAN);
        assert!(s.try_apply_force(Vector3::new(1.0, 0.0, 0.0), 1.0).is_err());
    }

    #[test]
    fn test_try_apply_force_rejects_non_finite_result() {
        let mut s = moving().with_mass(1.0);
        let before = s;
        let err = s.try_apply_force(Vector3::new(f64::INFINITY, 0.0, 0.0), 1.0);
        assert!(matches!(err, Err(KinematicsError::NonFiniteVelocity { .. })));
        assert_eq!(s, before);

        assert!(s.try_apply_force(Vector3::new(2.0, 0.0, 0.0), 0.5).is_ok());
        assert_eq!(s.velocity(), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_setters_do_not_touch_previous_pose() {
        let mut s = KinematicState::new(Vector3::new(1.0, 0.0, 0.0));
        s.set_velocity(Vector3::new(0.0, 1.0, 0.0));
        s.set_acceleration(Vector3::new(0.0, 0.0, 1.0));
        s.set_mass(2.0);
        assert_eq!(s.previous_position(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(s.velocity(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(s.acceleration(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(s.mass(), 2.0);
    }
}
