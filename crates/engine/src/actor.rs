// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actor spawn/kill/join (spec §1: "spawn/kill/join with cooperative
//! cancellation at suspension points"; spec §5 "Cancellation & kill").
//!
//! Follows the connection-handler cancellation pattern
//! (`crates/daemon/src/listener/mod.rs`): a `CancellationToken` is raced
//! against the actor body via `tokio::select!`, and the body itself checks
//! `cancel.is_cancelled()` between suspension points so a kill takes effect
//! promptly regardless of which `await` it lands on.

use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A handle to a running actor task. Dropping the handle does not stop the
/// actor — call [`ActorHandle::kill`] explicitly, or [`ActorHandle::join`]
/// to wait for natural completion.
pub struct ActorHandle<T> {
    name: String,
    cancel: CancellationToken,
    join: JoinHandle<T>,
}

impl<T> ActorHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request cancellation. The actor body observes this the next time it
    /// checks `cancel_token().is_cancelled()` or awaits
    /// `cancel_token().cancelled()`.
    pub fn kill(&self) {
        self.cancel.cancel();
    }

    pub fn is_killed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the actor to finish, whether by completing normally or by
    /// observing cancellation.
    pub async fn join(self) -> Result<T, tokio::task::JoinError> {
        self.join.await
    }

    pub fn abort(&self) {
        self.join.abort();
    }
}

/// Spawn `body(cancel)` as a new actor named `name`. `body` receives its own
/// `CancellationToken` and is responsible for checking it at suspension
/// points; the engine does not forcibly abort tasks (that would skip
/// `Drop`-based cleanup), it only signals and waits.
pub fn spawn<F, Fut, T>(name: impl Into<String>, body: F) -> ActorHandle<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let name = name.into();
    let cancel = CancellationToken::new();
    let join = tokio::spawn(body(cancel.clone()));
    ActorHandle { name, cancel, join }
}

/// Run `body` to completion unless `cancel` fires first, in which case
/// `on_cancel` supplies the result. This is the idiom actor bodies use at
/// every suspension point named in spec §5 (mailbox receive, sleep, compute,
/// disk operation).
pub async fn cancellable<Fut, T>(cancel: &CancellationToken, body: Fut, on_cancel: impl FnOnce() -> T) -> T
where
    Fut: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => on_cancel(),
        result = body => result,
    }
}

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;
