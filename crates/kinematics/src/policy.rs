/// What `update` does with position when the velocity is not finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGuard {
    /// Always integrate position, even with a NaN/Inf velocity.
    #[default]
    Unguarded,
    /// Leave position where it is while velocity is invalid.
    SkipInvalidVelocity,
}

/// Knobs for [`KinematicState::update_with`](crate::KinematicState::update_with).
///
/// The default reproduces the plain `update` rule: velocity integration is
/// guarded against invalid data, position integration is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntegrationPolicy {
    #[serde(default)]
    pub position_guard: PositionGuard,
}

impl IntegrationPolicy {
    pub fn guarded() -> Self {
        Self {
            position_guard: PositionGuard::SkipInvalidVelocity,
        }
    }
    pub fn with_position_guard(mut self, guard: PositionGuard) -> Self {
        self.position_guard = guard;
        self
    }
}
