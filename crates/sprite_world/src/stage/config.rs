//! Engine timing configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing parameters for the execution engine.
///
/// All durations are in milliseconds. The defaults reproduce the stage's
/// visual pacing; `fast()` collapses every delay to one millisecond so tests
/// exercise the full scheduling protocol without waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause between consecutive instructions of one sprite.
    pub step_pacing_ms: u64,
    /// Animation duration for MoveX/MoveY.
    pub move_anim_ms: u64,
    /// Animation duration for Turn.
    pub turn_anim_ms: u64,
    /// Animation duration for GoTo.
    pub goto_anim_ms: u64,
    /// Poll interval while waiting for scripts to arrive via an exchange.
    pub poll_interval_ms: u64,
    /// Back-off while another sprite's exchange is in flight.
    pub exchange_backoff_ms: u64,
    /// Pause before a sprite clears its own collision cooldown.
    pub cooldown_pause_ms: u64,
    /// Settle pause held (with the exclusion token) after an exchange.
    pub exchange_settle_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_pacing_ms: 400,
            move_anim_ms: 500,
            turn_anim_ms: 400,
            goto_anim_ms: 600,
            poll_interval_ms: 100,
            exchange_backoff_ms: 50,
            cooldown_pause_ms: 200,
            exchange_settle_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Millisecond-scale configuration for tests.
    pub fn fast() -> Self {
        Self {
            step_pacing_ms: 1,
            move_anim_ms: 1,
            turn_anim_ms: 1,
            goto_anim_ms: 1,
            poll_interval_ms: 1,
            exchange_backoff_ms: 1,
            cooldown_pause_ms: 1,
            exchange_settle_ms: 1,
        }
    }

    /// Clamp every interval to at least one millisecond. A zero pacing value
    /// would turn the executor's suspension points into busy spins.
    pub fn sanitized(&self) -> Self {
        Self {
            step_pacing_ms: self.step_pacing_ms.max(1),
            move_anim_ms: self.move_anim_ms.max(1),
            turn_anim_ms: self.turn_anim_ms.max(1),
            goto_anim_ms: self.goto_anim_ms.max(1),
            poll_interval_ms: self.poll_interval_ms.max(1),
            exchange_backoff_ms: self.exchange_backoff_ms.max(1),
            cooldown_pause_ms: self.cooldown_pause_ms.max(1),
            exchange_settle_ms: self.exchange_settle_ms.max(1),
        }
    }

    pub fn step_pacing(&self) -> Duration {
        Duration::from_millis(self.step_pacing_ms)
    }

    pub fn move_anim(&self) -> Duration {
        Duration::from_millis(self.move_anim_ms)
    }

    pub fn turn_anim(&self) -> Duration {
        Duration::from_millis(self.turn_anim_ms)
    }

    pub fn goto_anim(&self) -> Duration {
        Duration::from_millis(self.goto_anim_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn exchange_backoff(&self) -> Duration {
        Duration::from_millis(self.exchange_backoff_ms)
    }

    pub fn cooldown_pause(&self) -> Duration {
        Duration::from_millis(self.cooldown_pause_ms)
    }

    pub fn exchange_settle(&self) -> Duration {
        Duration::from_millis(self.exchange_settle_ms)
    }
}
