// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated storage: the `StorageService` trait and its in-memory
//! implementation, chunked file transfers charged against disk bandwidth,
//! and the manager that dedups concurrent transfers to the same location.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod movement_manager;
pub mod service;
pub mod transfer;

pub use movement_manager::{DataMovementManager, Lease};
pub use service::{SimpleStorageService, StorageService};
pub use transfer::{FileTransferThread, TransferKind};
