// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-host compute capacity and state (spec §1: "per-host compute
//! execution primitives ... and host up/down events").

use std::collections::HashMap;
use std::time::Duration;
use wrench_core::HostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct HostSpec {
    cores: u32,
    ram: f64,
    flop_rate: f64,
}

/// Static compute capacity of every host in the simulated platform, plus a
/// broadcast channel of `(host, state)` transitions that compute/storage
/// services subscribe to for the host-state-change detector (spec §2
/// supplement).
pub struct HostCatalog {
    specs: HashMap<HostId, HostSpec>,
    state_tx: tokio::sync::watch::Sender<(HostId, HostState)>,
}

impl HostCatalog {
    pub fn new() -> Self {
        let (state_tx, _rx) = tokio::sync::watch::channel((HostId::new(), HostState::Up));
        Self { specs: HashMap::new(), state_tx }
    }

    pub fn register_host(&mut self, host: HostId, cores: u32, ram: f64, flop_rate: f64) {
        self.specs.insert(host, HostSpec { cores, ram, flop_rate });
    }

    pub fn cores(&self, host: HostId) -> Option<u32> {
        self.specs.get(&host).map(|s| s.cores)
    }

    pub fn ram(&self, host: HostId) -> Option<f64> {
        self.specs.get(&host).map(|s| s.ram)
    }

    pub fn flop_rate(&self, host: HostId) -> Option<f64> {
        self.specs.get(&host).map(|s| s.flop_rate)
    }

    /// Wall-clock duration to execute `flops` using `num_threads` threads on
    /// `host`, assuming each thread gets an equal share of the host's
    /// aggregate flop rate (an `Mpi` action passes its rank count as
    /// `num_threads`; `Compute` actions call this once for the whole action
    /// after the caller has already applied a `ParallelModel` split).
    pub fn compute_duration(&self, host: HostId, flops: f64, num_threads: u32) -> Option<Duration> {
        let spec = self.specs.get(&host)?;
        let num_threads = num_threads.max(1).min(spec.cores).max(1) as f64;
        let per_thread_rate = spec.flop_rate / num_threads;
        Some(Duration::from_secs_f64(flops / per_thread_rate))
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<(HostId, HostState)> {
        self.state_tx.subscribe()
    }

    /// Mark `host` as transitioning to `state`, notifying subscribers (the
    /// host-state-change detector, per-action service-down checks).
    pub fn set_state(&self, host: HostId, state: HostState) {
        let _ = self.state_tx.send((host, state));
    }
}

impl Default for HostCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
