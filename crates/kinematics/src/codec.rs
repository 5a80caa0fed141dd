//! Serde-backed encodings of [`KinematicState`].
//!
//! JSON is the human-readable form and cannot carry NaN/Inf (they are written
//! as `null` and fail to decode). The binary form round-trips every value.

use crate::error::{KinematicsError, Result};
use crate::state::KinematicState;

pub fn to_json(state: &KinematicState) -> Result<String> {
    serde_json::to_string(state).map_err(|e| KinematicsError::Encode(e.to_string()))
}

pub fn to_json_pretty(state: &KinematicState) -> Result<String> {
    serde_json::to_string_pretty(state).map_err(|e| KinematicsError::Encode(e.to_string()))
}

pub fn from_json(json: &str) -> Result<KinematicState> {
    serde_json::from_str(json).map_err(|e| KinematicsError::Decode(e.to_string()))
}

pub fn to_bytes(state: &KinematicState) -> Result<Vec<u8>> {
    bincode::serialize(state).map_err(|e| KinematicsError::Encode(e.to_string()))
}

pub fn from_bytes(bytes: &[u8]) -> Result<KinematicState> {
    bincode::deserialize(bytes).map_err(|e| KinematicsError::Decode(e.to_string()))
}
