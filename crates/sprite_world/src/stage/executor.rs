//! Per-sprite execution: one cooperative task driving one sprite's program
//! counter over the shared world.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::animate::{StageAnimation, StageAnimator};
use super::config::EngineConfig;
use super::exchange::ExchangeCoordinator;
use super::runner::RunCounters;
use super::store::WorldStore;
use super::types::{Instruction, SpriteId};
use super::world::Sprite;

/// Everything an executor task needs; cheap to clone per spawned sprite.
pub(crate) struct ExecutorContext<A: StageAnimator> {
    pub(crate) store: WorldStore,
    pub(crate) coordinator: ExchangeCoordinator,
    pub(crate) animator: Arc<A>,
    pub(crate) config: EngineConfig,
    pub(crate) counters: Arc<RunCounters>,
}

impl<A: StageAnimator> Clone for ExecutorContext<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            coordinator: self.coordinator.clone(),
            animator: Arc::clone(&self.animator),
            config: self.config.clone(),
            counters: Arc::clone(&self.counters),
        }
    }
}

/// The program-counter loop for one sprite.
///
/// Every iteration starts from a fresh snapshot; the sprite disappearing or
/// the run being stopped ends the loop quietly. In hero mode an exhausted or
/// empty program polls instead of terminating, because an exchange can hand
/// this sprite a new program at any time.
pub(crate) async fn run_sprite<A: StageAnimator>(ctx: ExecutorContext<A>, sprite_id: SpriteId) {
    let mut cursor = 0usize;
    debug!(sprite = %sprite_id, "executor started");

    loop {
        let Some(view) = ctx.store.sprite_view(&sprite_id).await else {
            debug!(sprite = %sprite_id, "sprite removed mid-run");
            break;
        };
        if !view.running {
            debug!(sprite = %sprite_id, "run stopped");
            break;
        }

        // A just-completed exchange swapped this sprite's program out from
        // under it; start over on the new one.
        if ctx.coordinator.take_restart(&sprite_id) {
            debug!(sprite = %sprite_id, "restarting with exchanged scripts");
            cursor = 0;
        }

        if view.sprite.scripts.is_empty() || cursor >= view.sprite.scripts.len() {
            if !view.hero_mode {
                break;
            }
            // A cooldown must clear while idling too, or the sprite would
            // stay ineligible for every future collision.
            if view.sprite.collision_cooldown {
                sleep(ctx.config.cooldown_pause()).await;
                let _ = ctx.store.clear_collision_cooldown(&sprite_id).await;
                debug!(sprite = %sprite_id, "collision cooldown cleared");
                continue;
            }
            sleep(ctx.config.poll_interval()).await;
            continue;
        }

        // Another sprite's exchange is in flight; back off.
        if ctx.coordinator.is_busy() {
            sleep(ctx.config.exchange_backoff()).await;
            continue;
        }

        if view.sprite.collision_cooldown {
            sleep(ctx.config.cooldown_pause()).await;
            let _ = ctx.store.clear_collision_cooldown(&sprite_id).await;
            debug!(sprite = %sprite_id, "collision cooldown cleared");
            continue;
        }

        if view.hero_mode && view.sprite.pending_swap_with.is_none() && !ctx.coordinator.is_busy()
        {
            if let Some(hit) = ctx.store.detect_collision().await {
                ctx.counters.record_collision();
                debug!(
                    a = %hit.a,
                    b = %hit.b,
                    distance = hit.distance,
                    threshold = hit.threshold,
                    "collision flagged"
                );
            }
        }

        // Re-read: this pass (or a sibling executor's) may have flagged us.
        let Some(sprite) = ctx.store.try_get(&sprite_id).await else {
            break;
        };

        if view.hero_mode {
            if let Some(partner_id) = sprite.pending_swap_with.clone() {
                let partner_ready = match ctx.store.try_get(&partner_id).await {
                    Some(partner) => !partner.collision_cooldown,
                    None => false,
                };
                if partner_ready {
                    if let Some(guard) = ctx.coordinator.try_begin() {
                        match ctx.store.swap_scripts(&sprite_id, &partner_id).await {
                            Ok(()) => {
                                ctx.coordinator.mark_restart(&sprite_id);
                                ctx.coordinator.mark_restart(&partner_id);
                                cursor = 0;
                                ctx.counters.record_exchange();
                                info!(
                                    sprite = %sprite_id,
                                    partner = %partner_id,
                                    "scripts exchanged"
                                );
                            }
                            Err(error) => {
                                debug!(
                                    sprite = %sprite_id,
                                    partner = %partner_id,
                                    %error,
                                    "exchange aborted"
                                );
                            }
                        }
                        // Hold the token through the settle pause so no other
                        // exchange resolves while the world catches up.
                        sleep(ctx.config.exchange_settle()).await;
                        drop(guard);
                        continue;
                    }
                }
                // Swap preconditions unmet; the flag stays until a later
                // step resolves it.
            }
        }

        let Some(script) = sprite.scripts.get(cursor).cloned() else {
            continue;
        };
        debug!(
            sprite = %sprite_id,
            index = cursor,
            op = script.op.kind(),
            "executing instruction"
        );
        let _ = ctx.store.set_current_index(&sprite_id, cursor).await;
        execute_instruction(&ctx, &sprite_id, &sprite, &script.op).await;
        ctx.counters.record_instruction();

        cursor += 1;
        sleep(ctx.config.step_pacing()).await;
    }

    ctx.counters.record_executor_finished();
    debug!(sprite = %sprite_id, "executor finished");
}

/// Apply one instruction: animate to the target, then commit the new value to
/// the store. Say/Think commit immediately, hold for their display duration,
/// then clear.
async fn execute_instruction<A: StageAnimator>(
    ctx: &ExecutorContext<A>,
    sprite_id: &str,
    sprite: &Sprite,
    op: &Instruction,
) {
    match op {
        Instruction::MoveX { steps } => {
            let target = sprite.pos.x + steps;
            ctx.animator
                .animate(sprite_id, StageAnimation::MoveToX(target), ctx.config.move_anim())
                .await;
            let _ = ctx.store.move_x(sprite_id, *steps).await;
        }
        Instruction::MoveY { steps } => {
            let target = sprite.pos.y + steps;
            ctx.animator
                .animate(sprite_id, StageAnimation::MoveToY(target), ctx.config.move_anim())
                .await;
            let _ = ctx.store.move_y(sprite_id, *steps).await;
        }
        Instruction::Turn { degrees } => {
            let target = sprite.rotation + degrees;
            ctx.animator
                .animate(sprite_id, StageAnimation::RotateTo(target), ctx.config.turn_anim())
                .await;
            let _ = ctx.store.turn(sprite_id, *degrees).await;
        }
        Instruction::GoTo { x, y } => {
            ctx.animator
                .animate(
                    sprite_id,
                    StageAnimation::MoveTo { x: *x, y: *y },
                    ctx.config.goto_anim(),
                )
                .await;
            let _ = ctx.store.go_to(sprite_id, *x, *y).await;
        }
        Instruction::Say { text, seconds } => {
            let _ = ctx.store.say(sprite_id, text, *seconds).await;
            sleep(display_duration(*seconds)).await;
            let _ = ctx.store.clear_say(sprite_id).await;
        }
        Instruction::Think { text, seconds } => {
            let _ = ctx.store.think(sprite_id, text, *seconds).await;
            sleep(display_duration(*seconds)).await;
            let _ = ctx.store.clear_think(sprite_id).await;
        }
        Instruction::Unknown => {
            warn!(sprite = %sprite_id, "unknown instruction, skipping");
        }
    }
}

fn display_duration(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    }
}
