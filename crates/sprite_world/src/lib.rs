pub mod geometry;
pub mod stage;

pub use geometry::{stage_distance, StagePos, StageSize, SPAWN_PADDING};
pub use stage::{
    detect_collision, swap_scripts, CollisionHit, EngineConfig, ExchangeCoordinator,
    ExchangeGuard, Instruction, NoopAnimator, RunMetrics, Script, ScriptId, SleepAnimator, Sprite,
    SpriteId, SpriteKind, SpriteView, StageAnimation, StageAnimator, StageRunner, World,
    WorldError, WorldStore, COLLISION_THRESHOLD_DIVISOR, DEFAULT_DISPLAY_SECONDS,
    DEFAULT_MOVE_STEPS, DEFAULT_SAY_TEXT, DEFAULT_SPRITE_SIZE, DEFAULT_THINK_TEXT,
    DEFAULT_TURN_DEGREES,
};
