//! Core type definitions: IDs, constants, sprite kinds, and instructions.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

pub type SpriteId = String;
pub type ScriptId = String;

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_SPRITE_SIZE: f64 = 80.0;
pub const DEFAULT_MOVE_STEPS: f64 = 10.0;
pub const DEFAULT_TURN_DEGREES: f64 = 15.0;
pub const DEFAULT_DISPLAY_SECONDS: f64 = 2.0;
pub const DEFAULT_SAY_TEXT: &str = "Hello!";
pub const DEFAULT_THINK_TEXT: &str = "Hmm...";

/// Two sprites collide when their distance drops strictly below
/// `(size_a + size_b) / COLLISION_THRESHOLD_DIVISOR`.
pub const COLLISION_THRESHOLD_DIVISOR: f64 = 4.0;

// ============================================================================
// Sprite Kinds
// ============================================================================

/// The roster of sprite kinds a user can place on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    Cat,
    Dog,
    Bird,
    Rabbit,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 4] = [
        SpriteKind::Cat,
        SpriteKind::Dog,
        SpriteKind::Bird,
        SpriteKind::Rabbit,
    ];

    /// Stable identifier prefix used when allocating sprite ids.
    pub fn key(&self) -> &'static str {
        match self {
            SpriteKind::Cat => "cat",
            SpriteKind::Dog => "dog",
            SpriteKind::Bird => "bird",
            SpriteKind::Rabbit => "rabbit",
        }
    }

    /// Human-facing name used when numbering new sprites ("Cat 2").
    pub fn display_name(&self) -> &'static str {
        match self {
            SpriteKind::Cat => "Cat",
            SpriteKind::Dog => "Dog",
            SpriteKind::Bird => "Bird",
            SpriteKind::Rabbit => "Rabbit",
        }
    }

    /// Image asset name consumed by the rendering layer.
    pub fn image(&self) -> &'static str {
        match self {
            SpriteKind::Cat => "pixelated_cat.png",
            SpriteKind::Dog => "pixelated_dog.png",
            SpriteKind::Bird => "pixelated_penguin.png",
            SpriteKind::Rabbit => "pixelated_rabbit.png",
        }
    }
}

// ============================================================================
// Instructions
// ============================================================================

fn default_steps() -> f64 {
    DEFAULT_MOVE_STEPS
}

fn default_degrees() -> f64 {
    DEFAULT_TURN_DEGREES
}

fn default_seconds() -> f64 {
    DEFAULT_DISPLAY_SECONDS
}

fn default_say_text() -> String {
    DEFAULT_SAY_TEXT.to_string()
}

fn default_think_text() -> String {
    DEFAULT_THINK_TEXT.to_string()
}

/// One step of a sprite's program.
///
/// Movement steps are relative, `GoTo` is absolute. `Say`/`Think` display a
/// bubble for a duration without moving the sprite. An `Unknown` instruction
/// (an unrecognized tag from the authoring layer) executes as a logged no-op;
/// the cursor still advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    MoveX {
        #[serde(default = "default_steps")]
        steps: f64,
    },
    MoveY {
        #[serde(default = "default_steps")]
        steps: f64,
    },
    Turn {
        #[serde(default = "default_degrees")]
        degrees: f64,
    },
    GoTo {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Say {
        #[serde(default = "default_say_text")]
        text: String,
        #[serde(default = "default_seconds")]
        seconds: f64,
    },
    Think {
        #[serde(default = "default_think_text")]
        text: String,
        #[serde(default = "default_seconds")]
        seconds: f64,
    },
    #[serde(other)]
    Unknown,
}

impl Instruction {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Instruction::MoveX { .. } => "move_x",
            Instruction::MoveY { .. } => "move_y",
            Instruction::Turn { .. } => "turn",
            Instruction::GoTo { .. } => "go_to",
            Instruction::Say { .. } => "say",
            Instruction::Think { .. } => "think",
            Instruction::Unknown => "unknown",
        }
    }
}

/// A queued program entry. Entries carry their own id so the authoring layer
/// can remove and reorder them individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: ScriptId,
    pub op: Instruction,
}

impl Script {
    pub fn new(id: impl Into<String>, op: Instruction) -> Self {
        Self { id: id.into(), op }
    }
}
