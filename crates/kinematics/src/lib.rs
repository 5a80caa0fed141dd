// Kinematics library - single-body kinematic state with render interpolation

pub mod codec;
pub mod error;
pub mod interpolate;
pub mod policy;
pub mod rotation;
pub mod state;
pub mod validation;
pub mod vector;

// Re-export commonly used types
pub use error::{KinematicsError, Result};
pub use interpolate::Interpolate;
pub use policy::{IntegrationPolicy, PositionGuard};
pub use rotation::Rotation;
pub use state::{InitialState, KinematicState};
pub use validation::{Check, Issue, ValidationContext, ValidationResult};
pub use vector::Vector3;
