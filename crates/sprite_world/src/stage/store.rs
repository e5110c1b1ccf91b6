//! WorldStore: the single shared, serialized view of the world.
//!
//! Every executor reads snapshots and writes through single-mutation calls;
//! nothing outside this handle holds a live reference into the world, so no
//! partial mutation is ever observable.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::collision::{detect_collision, CollisionHit};
use super::error::WorldError;
use super::exchange::swap_scripts;
use super::types::{Instruction, ScriptId, SpriteKind};
use super::world::{Sprite, World};
use crate::geometry::StageSize;

/// One-lock snapshot of a sprite together with the world flags an executor
/// needs for a step.
#[derive(Debug, Clone)]
pub struct SpriteView {
    pub sprite: Sprite,
    pub hero_mode: bool,
    pub running: bool,
}

/// Cheap-clone handle to the shared world.
#[derive(Clone, Default)]
pub struct WorldStore {
    inner: Arc<RwLock<World>>,
}

impl WorldStore {
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    /// Run a single serialized mutation over the world. All named mutation
    /// helpers below are built on this.
    pub async fn apply<F, T>(&self, mutation: F) -> T
    where
        F: FnOnce(&mut World) -> T,
    {
        let mut world = self.inner.write().await;
        mutation(&mut world)
    }

    /// Read from a consistent snapshot of the world.
    pub async fn read<F, T>(&self, reader: F) -> T
    where
        F: FnOnce(&World) -> T,
    {
        let world = self.inner.read().await;
        reader(&world)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub async fn get(&self, id: &str) -> Result<Sprite, WorldError> {
        self.read(|world| world.sprite(id).cloned()).await
    }

    pub async fn try_get(&self, id: &str) -> Option<Sprite> {
        self.read(|world| world.sprites().get(id).cloned()).await
    }

    /// Snapshot of all sprites in id order, not a live view.
    pub async fn list(&self) -> Vec<Sprite> {
        self.read(|world| world.sprites().values().cloned().collect())
            .await
    }

    pub async fn sprite_view(&self, id: &str) -> Option<SpriteView> {
        self.read(|world| {
            world.sprites().get(id).map(|sprite| SpriteView {
                sprite: sprite.clone(),
                hero_mode: world.hero_mode_enabled(),
                running: world.is_running(),
            })
        })
        .await
    }

    pub async fn is_running(&self) -> bool {
        self.read(|world| world.is_running()).await
    }

    pub async fn hero_mode_enabled(&self) -> bool {
        self.read(|world| world.hero_mode_enabled()).await
    }

    // ------------------------------------------------------------------
    // Authoring mutations
    // ------------------------------------------------------------------

    pub async fn add_sprite(&self, kind: SpriteKind) -> String {
        self.apply(|world| world.add_sprite(kind)).await
    }

    pub async fn remove_sprite(&self, id: &str) -> Result<(), WorldError> {
        self.apply(|world| world.remove_sprite(id)).await
    }

    pub async fn rename_sprite(&self, id: &str, new_name: &str) -> Result<(), WorldError> {
        self.apply(|world| world.rename_sprite(id, new_name)).await
    }

    pub async fn resize_sprite(&self, id: &str, size: f64) -> Result<(), WorldError> {
        self.apply(|world| world.resize_sprite(id, size)).await
    }

    pub async fn set_rotation(&self, id: &str, rotation: f64) -> Result<(), WorldError> {
        self.apply(|world| world.set_rotation(id, rotation)).await
    }

    pub async fn set_position(&self, id: &str, x: f64, y: f64) -> Result<(), WorldError> {
        self.apply(|world| world.set_position(id, x, y)).await
    }

    pub async fn toggle_visibility(&self, id: &str) -> Result<bool, WorldError> {
        self.apply(|world| world.toggle_visibility(id)).await
    }

    pub async fn add_script(&self, id: &str, op: Instruction) -> Result<ScriptId, WorldError> {
        self.apply(|world| world.add_script(id, op)).await
    }

    pub async fn remove_script(&self, id: &str, script_id: &str) -> Result<(), WorldError> {
        self.apply(|world| world.remove_script(id, script_id)).await
    }

    pub async fn reorder_scripts(
        &self,
        id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), WorldError> {
        self.apply(|world| world.reorder_scripts(id, from_index, to_index))
            .await
    }

    pub async fn toggle_hero_mode(&self) -> bool {
        self.apply(|world| world.toggle_hero_mode()).await
    }

    pub async fn set_hero_mode(&self, enabled: bool) {
        self.apply(|world| world.set_hero_mode(enabled)).await
    }

    pub async fn set_stage_size(&self, size: StageSize) -> Result<(), WorldError> {
        self.apply(|world| world.set_stage_size(size)).await
    }

    // ------------------------------------------------------------------
    // Execution mutations
    // ------------------------------------------------------------------

    pub async fn move_x(&self, id: &str, steps: f64) -> Result<(), WorldError> {
        self.apply(|world| world.move_x(id, steps)).await
    }

    pub async fn move_y(&self, id: &str, steps: f64) -> Result<(), WorldError> {
        self.apply(|world| world.move_y(id, steps)).await
    }

    pub async fn turn(&self, id: &str, degrees: f64) -> Result<(), WorldError> {
        self.apply(|world| world.turn(id, degrees)).await
    }

    pub async fn go_to(&self, id: &str, x: f64, y: f64) -> Result<(), WorldError> {
        self.apply(|world| world.go_to(id, x, y)).await
    }

    pub async fn say(&self, id: &str, text: &str, seconds: f64) -> Result<(), WorldError> {
        self.apply(|world| world.say(id, text, seconds)).await
    }

    pub async fn clear_say(&self, id: &str) -> Result<(), WorldError> {
        self.apply(|world| world.clear_say(id)).await
    }

    pub async fn think(&self, id: &str, text: &str, seconds: f64) -> Result<(), WorldError> {
        self.apply(|world| world.think(id, text, seconds)).await
    }

    pub async fn clear_think(&self, id: &str) -> Result<(), WorldError> {
        self.apply(|world| world.clear_think(id)).await
    }

    pub async fn set_current_index(&self, id: &str, index: usize) -> Result<(), WorldError> {
        self.apply(|world| world.set_current_index(id, index)).await
    }

    pub async fn clear_collision_cooldown(&self, id: &str) -> Result<(), WorldError> {
        self.apply(|world| world.clear_collision_cooldown(id)).await
    }

    /// Run one collision-detection pass. Scan and flagging happen under the
    /// write lock, so passes never interleave.
    pub async fn detect_collision(&self) -> Option<CollisionHit> {
        self.apply(detect_collision).await
    }

    /// Atomically exchange two sprites' programs. Both must already be
    /// flagged for a swap with each other.
    pub async fn swap_scripts(&self, a_id: &str, b_id: &str) -> Result<(), WorldError> {
        self.apply(|world| swap_scripts(world, a_id, b_id)).await
    }
}

impl std::fmt::Debug for WorldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldStore").finish_non_exhaustive()
    }
}
