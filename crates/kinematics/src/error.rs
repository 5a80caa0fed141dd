use thiserror::Error;

use crate::vector::Vector3;

pub type Result<T> = std::result::Result<T, KinematicsError>;

#[derive(Debug, Error)]
pub enum KinematicsError {
    /// Force application needs a finite, non-zero mass.
    #[error("cannot apply force: mass {mass} is zero or not finite")]
    DegenerateMass { mass: f64 },

    /// Force application would leave the velocity with NaN/Inf components.
    #[error("force application produced a non-finite velocity {velocity:?}")]
    NonFiniteVelocity { velocity: Vector3 },

    #[error("failed to encode kinematic state: {0}")]
    Encode(String),

    #[error("failed to decode kinematic state: {0}")]
    Decode(String),
}
