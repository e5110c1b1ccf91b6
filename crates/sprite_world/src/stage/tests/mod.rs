//! Tests for the stage module.

use super::*;
use crate::geometry::StagePos;

mod basics;
mod runner;

/// Install the log subscriber once per test binary; `RUST_LOG` controls
/// verbosity when a test needs the engine's step-by-step trace.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build a visible sprite with a fixed position and size.
fn sprite_at(id: &str, x: f64, y: f64, size: f64) -> Sprite {
    let mut sprite = Sprite::new(id, SpriteKind::Cat, id);
    sprite.pos = StagePos::new(x, y);
    sprite.size = size;
    sprite
}

/// Build a world containing the given sprites as-is.
fn world_with(sprites: Vec<Sprite>) -> World {
    init_tracing();
    let mut world = World::new();
    for sprite in sprites {
        world.sprites.insert(sprite.id.clone(), sprite);
    }
    world
}

fn push_script(world: &mut World, id: &str, op: Instruction) {
    world.add_script(id, op).expect("sprite exists");
}

fn runner_with(world: World) -> StageRunner<NoopAnimator> {
    init_tracing();
    StageRunner::new(WorldStore::new(world), NoopAnimator, EngineConfig::fast())
}

/// Poll an async condition every few milliseconds until it holds or the
/// timeout expires.
async fn eventually<F, Fut>(timeout_ms: u64, check: F) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(timeout_ms);
    loop {
        if check().await {
            return true;
        }
        if std::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}
