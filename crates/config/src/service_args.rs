// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service-specific-argument parsing and validation (spec §6): a
//! `string -> string` map passed at job submission time, with a small fixed
//! vocabulary plus a wildcard entry keyed by action identifier.
//!
//! The spec's literal key for a placement hint is `<action_name>`; since
//! [`wrench_core::Action`] carries no separate name field, this workspace
//! keys that hint by the submitting `CompoundJob`'s per-action
//! [`wrench_core::ActionId`] (its `to_string()` form) instead — a deliberate
//! deviation recorded in `DESIGN.md`. Validation here treats any key that
//! parses as a UUID as a placement hint and otherwise falls back to the two
//! named universe/service keys, rejecting everything else with `NotAllowed`.

use std::collections::HashMap;
use wrench_core::FailureCause;

pub const UNIVERSE: &str = "-universe";
pub const SERVICE: &str = "-service";
pub const GRID_UNIVERSE: &str = "grid";

/// Validate a raw `service_specific_args` map, rejecting the first
/// unrecognized key with `FailureCause::NotAllowed`.
pub fn validate(service: &str, args: &HashMap<String, String>) -> Result<(), FailureCause> {
    for (key, value) in args {
        if key == UNIVERSE {
            if value != GRID_UNIVERSE {
                return Err(FailureCause::NotAllowed { service: service.to_string(), message: format!("unrecognized universe {value:?}") });
            }
            continue;
        }
        if key == SERVICE {
            continue;
        }
        if uuid::Uuid::parse_str(key).is_err() {
            return Err(FailureCause::NotAllowed { service: service.to_string(), message: format!("unrecognized service-specific argument key {key:?}") });
        }
    }
    Ok(())
}

/// The batch child service named by `-service`, when `-universe: grid` is
/// present.
pub fn grid_child_service(args: &HashMap<String, String>) -> Option<&str> {
    if args.get(UNIVERSE).map(String::as_str) != Some(GRID_UNIVERSE) {
        return None;
    }
    args.get(SERVICE).map(String::as_str)
}

/// The `host:num_cores` placement hint for `action`, if one was supplied.
pub fn placement_hint<'a>(args: &'a HashMap<String, String>, action: wrench_core::ActionId) -> Option<&'a str> {
    args.get(&action.to_string()).map(String::as_str)
}

#[cfg(test)]
#[path = "service_args_tests.rs"]
mod tests;
