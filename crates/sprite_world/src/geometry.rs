use serde::{Deserialize, Serialize};

/// A position on the stage. The origin sits at the stage center, so both
/// coordinates may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagePos {
    pub x: f64,
    pub y: f64,
}

impl StagePos {
    pub const ORIGIN: StagePos = StagePos { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for StagePos {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// Stage dimensions in stage units. Used only for spawn placement, never by
/// the execution core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StageSize {
    pub width: f64,
    pub height: f64,
}

impl StageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Margin kept between a freshly spawned sprite and the stage edge.
pub const SPAWN_PADDING: f64 = 5.0;

pub fn stage_distance(a: StagePos, b: StagePos) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    ((dx * dx) + (dy * dy)).sqrt()
}
