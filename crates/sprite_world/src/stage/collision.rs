//! Pairwise collision detection over visible sprites.

use serde::{Deserialize, Serialize};

use crate::geometry::stage_distance;

use super::types::{SpriteId, COLLISION_THRESHOLD_DIVISOR};
use super::world::World;

/// A collision flagged by the detector, reported for logging and metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionHit {
    pub a: SpriteId,
    pub b: SpriteId,
    pub distance: f64,
    pub threshold: f64,
}

/// Scan all unordered pairs of visible sprites and flag the first pair whose
/// distance is strictly below `(size_a + size_b) / 4`.
///
/// At most one collision is flagged per invocation: flagging both sprites and
/// returning early is what keeps simultaneous exchanges from cascading.
/// Pairs where either side is cooling down, already collided, or already
/// marked for a swap are skipped. Iteration follows the world's id order, so
/// detection is deterministic. No-op when hero mode is disabled.
///
/// Callers must invoke this inside a single serialized store mutation so the
/// scan-then-flag sequence cannot interleave with another detector pass.
pub fn detect_collision(world: &mut World) -> Option<CollisionHit> {
    if !world.hero_mode_enabled {
        return None;
    }

    let ids: Vec<SpriteId> = world
        .sprites
        .values()
        .filter(|s| s.visible)
        .map(|s| s.id.clone())
        .collect();

    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let (Some(a), Some(b)) = (world.sprites.get(&ids[i]), world.sprites.get(&ids[j]))
            else {
                continue;
            };

            if a.collision_cooldown || b.collision_cooldown {
                continue;
            }
            if a.has_collided || b.has_collided {
                continue;
            }
            if a.pending_swap_with.is_some() || b.pending_swap_with.is_some() {
                continue;
            }

            let distance = stage_distance(a.pos, b.pos);
            let threshold = (a.size + b.size) / COLLISION_THRESHOLD_DIVISOR;
            if distance < threshold {
                let hit = CollisionHit {
                    a: ids[i].clone(),
                    b: ids[j].clone(),
                    distance,
                    threshold,
                };
                if let Some(a) = world.sprites.get_mut(&ids[i]) {
                    a.pending_swap_with = Some(hit.b.clone());
                    a.has_collided = true;
                }
                if let Some(b) = world.sprites.get_mut(&ids[j]) {
                    b.pending_swap_with = Some(hit.a.clone());
                    b.has_collided = true;
                }
                return Some(hit);
            }
        }
    }
    None
}
