//! Error types for the stage module.

use std::error::Error;
use std::fmt;

use super::types::{ScriptId, SpriteId};

/// Errors produced by world mutations and queries.
///
/// None of these are fatal to a run: a sprite that disappears mid-run makes
/// its executor terminate quietly, and invalid authoring input is rejected at
/// the boundary with the prior value retained.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    SpriteNotFound { sprite_id: SpriteId },
    ScriptNotFound { sprite_id: SpriteId, script_id: ScriptId },
    InvalidSize { size: f64 },
    InvalidNumber { field: &'static str, value: f64 },
    InvalidIndex { index: usize, len: usize },
    SwapNotPending { sprite_id: SpriteId, other_id: SpriteId },
    Serde(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::SpriteNotFound { sprite_id } => {
                write!(f, "sprite not found: {sprite_id}")
            }
            WorldError::ScriptNotFound {
                sprite_id,
                script_id,
            } => write!(f, "script {script_id} not found on sprite {sprite_id}"),
            WorldError::InvalidSize { size } => {
                write!(f, "invalid sprite size: {size}")
            }
            WorldError::InvalidNumber { field, value } => {
                write!(f, "invalid numeric input for {field}: {value}")
            }
            WorldError::InvalidIndex { index, len } => {
                write!(f, "script index {index} out of range (len {len})")
            }
            WorldError::SwapNotPending {
                sprite_id,
                other_id,
            } => write!(
                f,
                "sprites {sprite_id} and {other_id} are not flagged for a swap with each other"
            ),
            WorldError::Serde(message) => write!(f, "serialization failed: {message}"),
        }
    }
}

impl Error for WorldError {}

impl From<serde_json::Error> for WorldError {
    fn from(error: serde_json::Error) -> Self {
        WorldError::Serde(error.to_string())
    }
}
