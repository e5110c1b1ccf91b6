//! StageRunner: spawns one executor per sprite, waits for all of them, and
//! resets the world around the run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::animate::StageAnimator;
use super::config::EngineConfig;
use super::exchange::ExchangeCoordinator;
use super::executor::{run_sprite, ExecutorContext};
use super::store::WorldStore;

// ============================================================================
// Metrics
// ============================================================================

/// Shared counters incremented by the executors during a run.
#[derive(Debug, Default)]
pub(crate) struct RunCounters {
    instructions_executed: AtomicU64,
    collisions_flagged: AtomicU64,
    exchanges_completed: AtomicU64,
    executors_finished: AtomicU64,
}

impl RunCounters {
    pub(crate) fn record_instruction(&self) {
        self.instructions_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_collision(&self) {
        self.collisions_flagged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_exchange(&self) {
        self.exchanges_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_executor_finished(&self) {
        self.executors_finished.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.instructions_executed.store(0, Ordering::Relaxed);
        self.collisions_flagged.store(0, Ordering::Relaxed);
        self.exchanges_completed.store(0, Ordering::Relaxed);
        self.executors_finished.store(0, Ordering::Relaxed);
    }

    fn snapshot(&self) -> RunMetrics {
        RunMetrics {
            instructions_executed: self.instructions_executed.load(Ordering::Relaxed),
            collisions_flagged: self.collisions_flagged.load(Ordering::Relaxed),
            exchanges_completed: self.exchanges_completed.load(Ordering::Relaxed),
            executors_finished: self.executors_finished.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time metrics for the current (or most recent) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub instructions_executed: u64,
    pub collisions_flagged: u64,
    pub exchanges_completed: u64,
    pub executors_finished: u64,
}

// ============================================================================
// StageRunner
// ============================================================================

/// Runs all sprites' programs concurrently over one shared world.
pub struct StageRunner<A: StageAnimator> {
    store: WorldStore,
    coordinator: ExchangeCoordinator,
    animator: Arc<A>,
    config: EngineConfig,
    counters: Arc<RunCounters>,
}

impl<A: StageAnimator> StageRunner<A> {
    pub fn new(store: WorldStore, animator: A, config: EngineConfig) -> Self {
        Self {
            store,
            coordinator: ExchangeCoordinator::new(),
            animator: Arc::new(animator),
            config: config.sanitized(),
            counters: Arc::new(RunCounters::default()),
        }
    }

    pub fn store(&self) -> &WorldStore {
        &self.store
    }

    pub fn metrics(&self) -> RunMetrics {
        self.counters.snapshot()
    }

    /// Run every sprite's program to completion (or, in hero mode, until
    /// `stop()`); returns the run's metrics. A no-op returning the current
    /// metrics if a run is already in progress.
    pub async fn run_all_scripts(&self) -> RunMetrics {
        let started = self
            .store
            .apply(|world| {
                if world.is_running() {
                    false
                } else {
                    world.reset_run_state();
                    world.set_running(true);
                    true
                }
            })
            .await;
        if !started {
            debug!("run already in progress");
            return self.counters.snapshot();
        }

        self.counters.reset();
        self.coordinator.clear_restarts();

        let sprite_ids: Vec<String> = self
            .store
            .read(|world| world.sprites().keys().cloned().collect())
            .await;
        info!(sprites = sprite_ids.len(), "starting script run");

        let mut executors = JoinSet::new();
        for sprite_id in sprite_ids {
            let ctx = ExecutorContext {
                store: self.store.clone(),
                coordinator: self.coordinator.clone(),
                animator: Arc::clone(&self.animator),
                config: self.config.clone(),
                counters: Arc::clone(&self.counters),
            };
            executors.spawn(run_sprite(ctx, sprite_id));
        }

        while let Some(joined) = executors.join_next().await {
            if let Err(error) = joined {
                warn!(%error, "executor task failed");
            }
        }

        // An exchange can leave stragglers mid-restart; reset cursors and
        // cooldowns once more before declaring the run over.
        self.store
            .apply(|world| {
                world.reset_run_state();
                world.set_running(false);
            })
            .await;

        let metrics = self.counters.snapshot();
        info!(
            instructions = metrics.instructions_executed,
            collisions = metrics.collisions_flagged,
            exchanges = metrics.exchanges_completed,
            "script run finished"
        );
        metrics
    }

    /// Cooperative cancellation: executors observe the cleared flag between
    /// steps and terminate; in-flight suspensions are not interrupted.
    pub async fn stop(&self) {
        self.store.apply(|world| world.set_running(false)).await;
        info!("stop requested");
    }
}

impl<A: StageAnimator> std::fmt::Debug for StageRunner<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRunner")
            .field("config", &self.config)
            .field("metrics", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}
