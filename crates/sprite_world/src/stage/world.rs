//! World entities: Sprite and the World they live in, plus every mutation
//! the authoring layer and the execution engine apply to them.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::{StagePos, StageSize, SPAWN_PADDING};

use super::error::WorldError;
use super::types::{
    Instruction, Script, ScriptId, SpriteId, SpriteKind, DEFAULT_SPRITE_SIZE,
};

// ============================================================================
// Sprite
// ============================================================================

/// A controllable on-stage entity with a position, a program, and the
/// collision bookkeeping used by hero mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    pub kind: SpriteKind,
    pub name: String,
    pub pos: StagePos,
    /// Rotation in degrees, unbounded; wrapping is a rendering concern.
    pub rotation: f64,
    /// Positive scalar used for both rendering and the collision radius.
    pub size: f64,
    pub visible: bool,
    pub scripts: Vec<Script>,
    /// Execution cursor: index of the next instruction, `scripts.len()` when
    /// the program is exhausted.
    pub current_index: usize,
    pub say_text: Option<String>,
    pub say_seconds: Option<f64>,
    pub think_text: Option<String>,
    pub think_seconds: Option<f64>,
    pub has_collided: bool,
    pub collision_cooldown: bool,
    pub pending_swap_with: Option<SpriteId>,
}

impl Sprite {
    pub fn new(id: impl Into<String>, kind: SpriteKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            pos: StagePos::ORIGIN,
            rotation: 0.0,
            size: DEFAULT_SPRITE_SIZE,
            visible: true,
            scripts: Vec::new(),
            current_index: 0,
            say_text: None,
            say_seconds: None,
            think_text: None,
            think_seconds: None,
            has_collided: false,
            collision_cooldown: false,
            pending_swap_with: None,
        }
    }

    /// The bubble text the display layer should render right now. Speech
    /// takes priority over thought; setting one does not clear the other.
    pub fn bubble(&self) -> Option<&str> {
        self.say_text
            .as_deref()
            .or(self.think_text.as_deref())
    }

    fn reset_run_state(&mut self) {
        self.current_index = 0;
        self.has_collided = false;
        self.collision_cooldown = false;
        self.pending_swap_with = None;
    }
}

// ============================================================================
// World
// ============================================================================

/// The set of all sprites plus the world-level flags.
///
/// Sprites live in a `BTreeMap` so every scan over them (most importantly the
/// collision detector's pair iteration) runs in stable id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct World {
    pub(crate) sprites: BTreeMap<SpriteId, Sprite>,
    pub(crate) hero_mode_enabled: bool,
    pub(crate) running: bool,
    pub(crate) stage_size: StageSize,
    #[serde(default)]
    next_script_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self) -> &BTreeMap<SpriteId, Sprite> {
        &self.sprites
    }

    pub fn sprite(&self, id: &str) -> Result<&Sprite, WorldError> {
        self.sprites.get(id).ok_or_else(|| WorldError::SpriteNotFound {
            sprite_id: id.to_string(),
        })
    }

    fn sprite_mut(&mut self, id: &str) -> Result<&mut Sprite, WorldError> {
        self.sprites
            .get_mut(id)
            .ok_or_else(|| WorldError::SpriteNotFound {
                sprite_id: id.to_string(),
            })
    }

    pub fn hero_mode_enabled(&self) -> bool {
        self.hero_mode_enabled
    }

    pub fn set_hero_mode(&mut self, enabled: bool) {
        self.hero_mode_enabled = enabled;
    }

    pub fn toggle_hero_mode(&mut self) -> bool {
        self.hero_mode_enabled = !self.hero_mode_enabled;
        self.hero_mode_enabled
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn stage_size(&self) -> StageSize {
        self.stage_size
    }

    /// Set the stage dimensions used for spawn placement. Non-finite
    /// dimensions are rejected and the prior size is retained.
    pub fn set_stage_size(&mut self, size: StageSize) -> Result<(), WorldError> {
        if !size.width.is_finite() {
            return Err(WorldError::InvalidNumber {
                field: "width",
                value: size.width,
            });
        }
        if !size.height.is_finite() {
            return Err(WorldError::InvalidNumber {
                field: "height",
                value: size.height,
            });
        }
        self.stage_size = size;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Roster operations
    // ------------------------------------------------------------------

    /// Add a sprite of the given kind at a random spot inside the stage
    /// bounds (minus a small edge padding). Returns the new sprite's id.
    pub fn add_sprite(&mut self, kind: SpriteKind) -> SpriteId {
        let id = self.allocate_sprite_id(kind);
        let ordinal = self
            .sprites
            .values()
            .filter(|s| s.kind == kind)
            .count()
            + 1;
        let name = format!("{} {ordinal}", kind.display_name());

        let mut sprite = Sprite::new(id.clone(), kind, name);
        sprite.pos = self.spawn_position();
        self.sprites.insert(id.clone(), sprite);
        id
    }

    fn allocate_sprite_id(&self, kind: SpriteKind) -> SpriteId {
        let mut n = self.sprites.len() + 1;
        loop {
            let candidate = format!("{}{n}", kind.key());
            if !self.sprites.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn spawn_position(&self) -> StagePos {
        let max_x = self.stage_size.width / 2.0 - SPAWN_PADDING;
        let max_y = self.stage_size.height / 2.0 - SPAWN_PADDING;
        // NaN bounds fail this comparison too and fall back to the origin;
        // a NaN range would make `gen_range` panic.
        if !(max_x > 0.0 && max_y > 0.0) {
            return StagePos::ORIGIN;
        }
        let mut rng = rand::thread_rng();
        StagePos::new(rng.gen_range(-max_x..max_x), rng.gen_range(-max_y..max_y))
    }

    pub fn remove_sprite(&mut self, id: &str) -> Result<(), WorldError> {
        self.sprites
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| WorldError::SpriteNotFound {
                sprite_id: id.to_string(),
            })
    }

    pub fn rename_sprite(&mut self, id: &str, new_name: &str) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.name = new_name.trim().to_string();
        Ok(())
    }

    /// Resize a sprite. Non-finite or non-positive sizes are rejected and the
    /// prior value is retained (authoring-boundary validation).
    pub fn resize_sprite(&mut self, id: &str, size: f64) -> Result<(), WorldError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(WorldError::InvalidSize { size });
        }
        let sprite = self.sprite_mut(id)?;
        sprite.size = size;
        Ok(())
    }

    /// Set an absolute rotation from the authoring panel.
    pub fn set_rotation(&mut self, id: &str, rotation: f64) -> Result<(), WorldError> {
        if !rotation.is_finite() {
            return Err(WorldError::InvalidNumber {
                field: "rotation",
                value: rotation,
            });
        }
        let sprite = self.sprite_mut(id)?;
        sprite.rotation = rotation;
        Ok(())
    }

    /// Set an absolute position from the authoring panel.
    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), WorldError> {
        if !x.is_finite() {
            return Err(WorldError::InvalidNumber { field: "x", value: x });
        }
        if !y.is_finite() {
            return Err(WorldError::InvalidNumber { field: "y", value: y });
        }
        let sprite = self.sprite_mut(id)?;
        sprite.pos = StagePos::new(x, y);
        Ok(())
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.visible = !sprite.visible;
        Ok(sprite.visible)
    }

    // ------------------------------------------------------------------
    // Script queue operations
    // ------------------------------------------------------------------

    /// Append an instruction to a sprite's program. Returns the queue entry's
    /// generated id.
    pub fn add_script(&mut self, id: &str, op: Instruction) -> Result<ScriptId, WorldError> {
        self.next_script_id += 1;
        let script_id = self.next_script_id.to_string();
        let sprite = self.sprite_mut(id)?;
        sprite.scripts.push(Script::new(script_id.clone(), op));
        Ok(script_id)
    }

    pub fn remove_script(&mut self, id: &str, script_id: &str) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        let before = sprite.scripts.len();
        sprite.scripts.retain(|s| s.id != script_id);
        if sprite.scripts.len() == before {
            return Err(WorldError::ScriptNotFound {
                sprite_id: id.to_string(),
                script_id: script_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn reorder_scripts(
        &mut self,
        id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        let len = sprite.scripts.len();
        if from_index >= len {
            return Err(WorldError::InvalidIndex {
                index: from_index,
                len,
            });
        }
        if to_index >= len {
            return Err(WorldError::InvalidIndex {
                index: to_index,
                len,
            });
        }
        let moved = sprite.scripts.remove(from_index);
        sprite.scripts.insert(to_index, moved);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Execution mutations
    // ------------------------------------------------------------------

    pub fn move_x(&mut self, id: &str, steps: f64) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.pos.x += steps;
        Ok(())
    }

    pub fn move_y(&mut self, id: &str, steps: f64) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.pos.y += steps;
        Ok(())
    }

    pub fn turn(&mut self, id: &str, degrees: f64) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.rotation += degrees;
        Ok(())
    }

    /// Absolute positioning, not additive.
    pub fn go_to(&mut self, id: &str, x: f64, y: f64) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.pos = StagePos::new(x, y);
        Ok(())
    }

    pub fn say(&mut self, id: &str, text: &str, seconds: f64) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.say_text = Some(text.to_string());
        sprite.say_seconds = Some(seconds);
        Ok(())
    }

    pub fn clear_say(&mut self, id: &str) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.say_text = None;
        sprite.say_seconds = None;
        Ok(())
    }

    pub fn think(&mut self, id: &str, text: &str, seconds: f64) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.think_text = Some(text.to_string());
        sprite.think_seconds = Some(seconds);
        Ok(())
    }

    pub fn clear_think(&mut self, id: &str) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.think_text = None;
        sprite.think_seconds = None;
        Ok(())
    }

    pub fn set_current_index(&mut self, id: &str, index: usize) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.current_index = index;
        Ok(())
    }

    /// Clear a sprite's collision bookkeeping: cooldown, collided flag, and
    /// any pending swap marker.
    pub fn clear_collision_cooldown(&mut self, id: &str) -> Result<(), WorldError> {
        let sprite = self.sprite_mut(id)?;
        sprite.collision_cooldown = false;
        sprite.has_collided = false;
        sprite.pending_swap_with = None;
        Ok(())
    }

    /// Reset every sprite's cursor and collision bookkeeping. Applied when a
    /// run starts and again when it finishes.
    pub fn reset_run_state(&mut self) {
        for sprite in self.sprites.values_mut() {
            sprite.reset_run_state();
        }
    }
}
