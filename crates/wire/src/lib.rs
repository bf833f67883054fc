// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed in-process messages and execution events exchanged between the
//! job manager, compute and storage services, and the XRootD overlay.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod events;
pub mod messages;

pub use events::ExecutionEvent;
pub use messages::{
    ActionExecutorCrash, ActionExecutorDone, ActionExecutorFailed, CompoundJobAck, CompoundJobDone, CompoundJobFailed, ContinueSearch, Message,
    ServiceTtlExpired, SubmitCompoundJobRequest, TerminateAction, TerminateJob, UpdateCache,
};
