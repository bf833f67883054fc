// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated-time clocks (spec §1: "provide a virtual clock").
//!
//! Follows the `Clock`/`SystemClock`/`FakeClock` trio
//! (`crates/core/src/clock.rs`), adapted to report simulated seconds rather
//! than wall-clock `Instant`s: a `VirtualClock` rides on Tokio's paused-time
//! facility so `sleep_for` advances deterministically without real waiting.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A source of simulated seconds.
#[async_trait::async_trait]
pub trait Clock: Clone + Send + Sync {
    /// Current simulated time, in seconds since the clock was created.
    fn now(&self) -> f64;

    /// Suspend the calling task until `duration` of simulated time has
    /// passed.
    async fn sleep_for(&self, duration: Duration);
}

/// Real simulated-time clock: wraps `tokio::time`, meant to be used under a
/// runtime started with `tokio::time::pause()` so that virtual time advances
/// only as far as outstanding timers require (spec §9 determinism
/// requirement — no wall-clock jitter in test runs).
#[derive(Clone, Default)]
pub struct VirtualClock {
    origin: Arc<tokio::time::Instant>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self { origin: Arc::new(tokio::time::Instant::now()) }
    }
}

#[async_trait::async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> f64 {
        tokio::time::Instant::now().saturating_duration_since(*self.origin).as_secs_f64()
    }

    async fn sleep_for(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Deterministic clock for unit tests that don't want a Tokio runtime at
/// all: `advance()` moves time forward instantly, `sleep_for` resolves
/// immediately (the caller is expected to call `advance` itself to model
/// elapsed time, mirroring `FakeClock::advance`).
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Arc<Mutex<f64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration.as_secs_f64();
    }

    pub fn set(&self, seconds: f64) {
        *self.now.lock() = seconds;
    }
}

#[async_trait::async_trait]
impl Clock for FakeClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }

    async fn sleep_for(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
