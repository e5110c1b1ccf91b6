//! Stage engine module - the concurrent script execution core.
//!
//! This module is organized into submodules:
//! - `types`: Core type definitions (IDs, sprite kinds, instructions)
//! - `error`: Error types for world operations
//! - `config`: Engine timing configuration
//! - `world`: World entities (Sprite, World) and their mutations
//! - `store`: WorldStore, the shared serialized view of the world
//! - `collision`: Pairwise collision detection
//! - `exchange`: Script exchange and the world-scoped exclusion token
//! - `animate`: The suspend-until-complete animation capability
//! - `executor`: Per-sprite execution loop
//! - `runner`: StageRunner orchestration and run metrics

mod animate;
mod collision;
mod config;
mod error;
mod exchange;
mod executor;
mod runner;
mod store;
mod types;
mod world;

#[cfg(test)]
mod tests;

pub use animate::{NoopAnimator, SleepAnimator, StageAnimation, StageAnimator};
pub use collision::{detect_collision, CollisionHit};
pub use config::EngineConfig;
pub use error::WorldError;
pub use exchange::{swap_scripts, ExchangeCoordinator, ExchangeGuard};
pub use runner::{RunMetrics, StageRunner};
pub use store::{SpriteView, WorldStore};
pub use types::{
    Instruction, Script, ScriptId, SpriteId, SpriteKind, COLLISION_THRESHOLD_DIVISOR,
    DEFAULT_DISPLAY_SECONDS, DEFAULT_MOVE_STEPS, DEFAULT_SAY_TEXT, DEFAULT_SPRITE_SIZE,
    DEFAULT_THINK_TEXT, DEFAULT_TURN_DEGREES,
};
pub use world::{Sprite, World};
