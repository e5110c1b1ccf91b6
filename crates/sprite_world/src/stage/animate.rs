//! The animation capability consumed by the executor.
//!
//! The real stage animates sprite properties with a tweening layer that the
//! executor only ever awaits; the engine never inspects partial progress.
//! `SleepAnimator` stands in for that layer by suspending for the full
//! duration, `NoopAnimator` completes immediately for tests.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The visual change a single instruction drives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum StageAnimation {
    MoveToX(f64),
    MoveToY(f64),
    RotateTo(f64),
    MoveTo { x: f64, y: f64 },
}

/// Suspend-until-complete animation of one sprite property.
///
/// Implementations must not report partial or interrupted completion; the
/// executor commits the target value to the store only after the returned
/// future resolves.
pub trait StageAnimator: Send + Sync + 'static {
    fn animate(
        &self,
        sprite_id: &str,
        animation: StageAnimation,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send;
}

/// Production stand-in for the external tween: holds the executor for the
/// animation's visual duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepAnimator;

impl StageAnimator for SleepAnimator {
    fn animate(
        &self,
        _sprite_id: &str,
        _animation: StageAnimation,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Completes every animation immediately. Used by tests so runs are paced by
/// the engine's own suspension points only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnimator;

impl StageAnimator for NoopAnimator {
    fn animate(
        &self,
        _sprite_id: &str,
        _animation: StageAnimation,
        _duration: Duration,
    ) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}
