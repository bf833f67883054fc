// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named, in-process mailboxes (spec §1: "named mailboxes with bounded
//! send/receive and timeout semantics"; spec §9: "the global sequence number
//! generator for mailbox uniqueness").

use crate::clock::Clock;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

const MAILBOX_CAPACITY: usize = 64;

/// An opaque in-process payload handed between actors through a mailbox.
/// `wrench-wire::Message` is the concrete payload type used everywhere in
/// this workspace; kept generic here so the engine crate has no dependency
/// on the message catalog.
pub type Envelope = Arc<dyn std::any::Any + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecvError {
    #[error("receive on mailbox timed out")]
    Timeout,
    #[error("mailbox was closed")]
    Closed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("mailbox is closed or its receiver was dropped")]
pub struct SendError;

/// Process-wide registry of named mailboxes, each backed by a bounded
/// `mpsc` channel. Follows the actor-mailbox convention
/// (`crates/daemon/src/engine/runtime/mod.rs`), generalized from a fixed set
/// of agent mailboxes to arbitrary named mailboxes created on demand, as
/// required by XRootD's per-search temporary answer mailboxes.
#[derive(Default)]
pub struct MailboxHub {
    mailboxes: Mutex<HashMap<String, mpsc::Sender<Envelope>>>,
    receivers: Mutex<HashMap<String, mpsc::Receiver<Envelope>>>,
    sequence: AtomicU64,
}

impl MailboxHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mailbox under `name`, replacing any existing one of the same
    /// name. Returns the receiving half for the actor that owns this
    /// mailbox to poll.
    pub fn create(&self, name: impl Into<String>) -> String {
        let name = name.into();
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        self.mailboxes.lock().insert(name.clone(), tx);
        self.receivers.lock().insert(name.clone(), rx);
        name
    }

    /// Generate and create a fresh, process-unique mailbox name with
    /// `prefix`, backed by the shared monotonic sequence counter.
    pub fn create_unique(&self, prefix: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.create(format!("{prefix}_{seq}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.mailboxes.lock().contains_key(name)
    }

    pub fn remove(&self, name: &str) {
        self.mailboxes.lock().remove(name);
        self.receivers.lock().remove(name);
    }

    /// Blocking send: awaits capacity on `name`'s channel.
    pub async fn put(&self, name: &str, message: Envelope) -> Result<(), SendError> {
        let sender = self.mailboxes.lock().get(name).cloned().ok_or(SendError)?;
        sender.send(message).await.map_err(|_| SendError)
    }

    /// Fire-and-forget send: drops the message silently if the mailbox is
    /// full or missing, the `dput` best-effort notify
    /// path used for non-critical signals.
    pub fn dput(&self, name: &str, message: Envelope) {
        if let Some(sender) = self.mailboxes.lock().get(name).cloned() {
            let _ = sender.try_send(message);
        }
    }

    /// Receive the next message on `name`, racing against `timeout` seconds
    /// of simulated time on `clock`.
    pub async fn get<C: Clock>(&self, name: &str, clock: &C, timeout_secs: f64) -> Result<Envelope, RecvError> {
        tokio::select! {
            biased;
            result = self.recv(name) => result.ok_or(RecvError::Closed),
            _ = clock.sleep_for(std::time::Duration::from_secs_f64(timeout_secs.max(0.0))) => Err(RecvError::Timeout),
        }
    }

    async fn recv(&self, name: &str) -> Option<Envelope> {
        loop {
            let maybe_ready = {
                let mut receivers = self.receivers.lock();
                receivers.get_mut(name).map(|rx| rx.try_recv())
            };
            match maybe_ready {
                Some(Ok(msg)) => return Some(msg),
                Some(Err(mpsc::error::TryRecvError::Empty)) => {
                    tokio::task::yield_now().await;
                }
                Some(Err(mpsc::error::TryRecvError::Disconnected)) => return None,
                None => return None,
            }
        }
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
