use crate::state::KinematicState;

/// Which check flagged a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Finite,
    SpeedLimit,
    PositionChange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub check: Check,
    pub message: String,
}

/// Problems found in one kinematic state; empty means valid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, check: Check, message: String) {
        self.issues.push(Issue { check, message });
    }

    fn merge(mut self, other: ValidationResult) -> Self {
        self.issues.extend(other.issues);
        self
    }

    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Tick length and physical limits the checks compare against
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationContext {
    pub delta_time: f64,
    pub max_speed: f64,
    pub max_acceleration: f64,
}

impl ValidationContext {
    pub fn new(delta_time: f64) -> Self {
        Self {
            delta_time,
            max_speed: 100.0,       // units/s
            max_acceleration: 50.0, // units/s²
        }
    }

    pub fn with_physics_limits(mut self, max_speed: f64, max_acceleration: f64) -> Self {
        self.max_speed = max_speed;
        self.max_acceleration = max_acceleration;
        self
    }
}

/// One error per field holding NaN or infinity.
pub fn validate_finite(state: &KinematicState) -> ValidationResult {
    let mut result = ValidationResult::default();
    let vectors = [
        ("previous_position", state.previous_position()),
        ("position", state.position()),
        ("velocity", state.velocity()),
        ("acceleration", state.acceleration()),
    ];
    for (name, v) in vectors {
        if !v.is_valid() {
            result.push(Check::Finite, format!("{} is not finite: {:?}", name, v));
        }
    }
    for (name, r) in [
        ("previous_rotation", state.previous_rotation()),
        ("rotation", state.rotation()),
    ] {
        if !r.is_valid() {
            result.push(Check::Finite, format!("{} is not finite: {:?}", name, r));
        }
    }
    if !state.mass().is_finite() {
        result.push(Check::Finite, format!("mass is not finite: {}", state.mass()));
    }
    result
}

pub fn validate_speed_limit(state: &KinematicState, context: &ValidationContext) -> ValidationResult {
    let mut result = ValidationResult::default();
    let speed = state.velocity().length();

    if speed > context.max_speed {
        result.push(
            Check::SpeedLimit,
            format!("Speed too high: {:.2}/s > {:.2}/s", speed, context.max_speed),
        );
    }
    result
}

/// Checks that the last step moved no further than the velocity allows.
///
/// Position advances with the velocity from before the tick, which differs from
/// the stored one by at most one tick of acceleration, hence the slack term.
pub fn validate_position_change(
    state: &KinematicState,
    context: &ValidationContext,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    let distance = state.previous_position().distance(&state.position());
    let current_speed = state.velocity().length();
    let max_distance =
        (current_speed + context.max_acceleration * context.delta_time) * context.delta_time;

    if distance > max_distance {
        result.push(
            Check::PositionChange,
            format!(
                "Position change too large: {:.2} > {:.2} (speed: {:.2}/s)",
                distance, max_distance, current_speed
            ),
        );
    }
    result
}

pub fn validate_state(state: &KinematicState, context: &ValidationContext) -> ValidationResult {
    validate_finite(state)
        .merge(validate_speed_limit(state, context))
        .merge(validate_position_change(state, context))
}
