// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity of a job's originator (the `ExecutionController` mailbox that
//! submitted it and should receive its completion/failure event).

use serde::{Deserialize, Serialize};

/// The mailbox name of the actor that should receive a job's terminal
/// event. Follows the `OwnerId` pattern (there distinguishing
/// `Job`/`Crew` owners); here it simply names a mailbox, since every job in
/// this core is owned by whichever `ExecutionController` submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginatorMailbox(String);

impl OriginatorMailbox {
    pub fn new(mailbox: impl Into<String>) -> Self {
        Self(mailbox.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OriginatorMailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OriginatorMailbox {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
