// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The simulation substrate: a virtual clock, named mailboxes, actor
//! spawn/kill/join, and per-host/per-disk resource primitives.
//!
//! This crate plays the role of the external collaborator the rest of the
//! workspace is written against — compute services, storage services, and
//! the XRootD overlay all build their behavior on top of `Clock`,
//! `MailboxHub`, `spawn`, `HostCatalog`, and `DiskCatalog` rather than
//! reaching for `tokio` directly.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod actor;
pub mod clock;
pub mod disk;
pub mod host;
pub mod mailbox;

pub use actor::{cancellable, spawn, ActorHandle};
pub use clock::{Clock, FakeClock, VirtualClock};
pub use disk::DiskCatalog;
pub use host::{HostCatalog, HostState};
pub use mailbox::{Envelope, MailboxHub, RecvError, SendError};
