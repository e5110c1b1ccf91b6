//! Script exchange: the atomic swap of two sprites' programs, and the
//! world-scoped coordination that allows at most one exchange in flight.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::WorldError;
use super::types::SpriteId;
use super::world::World;

/// Swap two sprites' entire programs.
///
/// Precondition: both sprites exist and their `pending_swap_with` fields point
/// at each other. Both script vectors are cloned before reassignment, so the
/// sprites never share a script buffer afterwards. Both cursors reset to 0,
/// collision flags clear, and both sprites enter collision cooldown.
pub fn swap_scripts(world: &mut World, a_id: &str, b_id: &str) -> Result<(), WorldError> {
    let a = world.sprite(a_id)?;
    let b = world.sprite(b_id)?;
    let symmetric = a.pending_swap_with.as_deref() == Some(b_id)
        && b.pending_swap_with.as_deref() == Some(a_id);
    if !symmetric {
        return Err(WorldError::SwapNotPending {
            sprite_id: a_id.to_string(),
            other_id: b_id.to_string(),
        });
    }

    let a_scripts = a.scripts.clone();
    let b_scripts = b.scripts.clone();

    if let Some(a) = world.sprites.get_mut(a_id) {
        a.scripts = b_scripts;
        a.current_index = 0;
        a.pending_swap_with = None;
        a.has_collided = false;
        a.collision_cooldown = true;
    }
    if let Some(b) = world.sprites.get_mut(b_id) {
        b.scripts = a_scripts;
        b.current_index = 0;
        b.pending_swap_with = None;
        b.has_collided = false;
        b.collision_cooldown = true;
    }
    Ok(())
}

/// Guard representing the world-scoped exclusion token. Dropping it releases
/// the token.
pub struct ExchangeGuard {
    _token: OwnedMutexGuard<()>,
}

/// Coordinates exchanges across all executors.
///
/// The exclusion token is a non-reentrant world-scoped lock: taking it is how
/// an executor wins the right to resolve a flagged collision, and `is_busy`
/// is how every other executor backs off while the exchange settles. Restart
/// markers tell the two participating executors to reset their local cursors
/// instead of continuing through the program that was just swapped away.
#[derive(Clone, Default)]
pub struct ExchangeCoordinator {
    token: Arc<Mutex<()>>,
    restarts: Arc<StdMutex<BTreeSet<SpriteId>>>,
}

impl ExchangeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while some executor holds the exclusion token.
    pub fn is_busy(&self) -> bool {
        self.token.try_lock().is_err()
    }

    /// Attempt to take the exclusion token without waiting.
    pub fn try_begin(&self) -> Option<ExchangeGuard> {
        Arc::clone(&self.token)
            .try_lock_owned()
            .ok()
            .map(|token| ExchangeGuard { _token: token })
    }

    /// Mark a sprite so its executor restarts from cursor 0.
    pub fn mark_restart(&self, sprite_id: &str) {
        if let Ok(mut restarts) = self.restarts.lock() {
            restarts.insert(sprite_id.to_string());
        }
    }

    /// Consume a sprite's restart marker, returning whether one was set.
    pub fn take_restart(&self, sprite_id: &str) -> bool {
        match self.restarts.lock() {
            Ok(mut restarts) => restarts.remove(sprite_id),
            Err(_) => false,
        }
    }

    /// Drop all restart markers (applied when a fresh run starts).
    pub fn clear_restarts(&self) {
        if let Ok(mut restarts) = self.restarts.lock() {
            restarts.clear();
        }
    }
}

impl std::fmt::Debug for ExchangeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCoordinator")
            .field("busy", &self.is_busy())
            .finish()
    }
}
