// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host admission and best-fit placement for [`crate::bare_metal::BareMetalComputeService`]
//! (spec §4.3). Pure functions over a [`HostCatalog`] snapshot and the
//! service's own availability maps, kept free of mailbox/actor concerns so
//! placement logic is independently testable.

use std::collections::HashMap;
use wrench_core::{Action, HostId};
use wrench_engine::HostCatalog;

/// Whether some host in `hosts` could ever admit `action` at its minimum
/// resource requirement (spec §4.3 admission check: "there exists some host
/// with `cores >= a.min_cores` and `ram >= a.min_ram`").
pub fn host_exists_for(action: &Action, hosts: &[HostId], catalog: &HostCatalog) -> bool {
    hosts.iter().any(|h| {
        catalog.cores(*h).map(|c| c >= action.min_cores()).unwrap_or(false) && catalog.ram(*h).map(|r| r >= action.ram()).unwrap_or(false)
    })
}

/// Resolve a `"host:num_cores"`-shaped service-specific-argument hint to one
/// of `hosts` by matching the host's `Display` form (our hosts have no
/// separate human name; the hint is expected to carry the host's id
/// string). Malformed or non-matching hints are ignored rather than
/// rejected — the scheduler falls back to unconstrained placement; key/value
/// legality is validated upstream in `wrench-config::service_args`.
fn hinted_host(hint: Option<&str>, hosts: &[HostId]) -> Option<HostId> {
    let hint = hint?;
    let name = hint.split(':').next()?;
    hosts.iter().find(|h| h.to_string() == name).copied()
}

/// Best-fit-by-remaining-cores placement: among hosts with enough free
/// cores and RAM for `action`, choose the one that would have the fewest
/// cores left over after reserving `action`'s share, honoring `hint` when
/// it names an eligible host (spec §4.3: "using a best-fit-by-remaining-cores
/// rule with the host specified by `service_specific_args[action.name]`
/// when present").
///
/// Returns the chosen host plus the number of cores actually reserved
/// (`clamp(min_cores, max_cores, free_cores)`).
pub fn select_host(
    action: &Action,
    hosts: &[HostId],
    catalog: &HostCatalog,
    ram_available: &HashMap<HostId, f64>,
    running_threads: &HashMap<HostId, u32>,
    hint: Option<&str>,
) -> Option<(HostId, u32)> {
    let candidates: Vec<HostId> = match hinted_host(hint, hosts) {
        Some(h) => vec![h],
        None => hosts.to_vec(),
    };

    candidates
        .into_iter()
        .filter_map(|h| {
            let cores = catalog.cores(h)?;
            let ram = ram_available.get(&h).copied().unwrap_or(0.0);
            let used_threads = running_threads.get(&h).copied().unwrap_or(0);
            let free_cores = cores.saturating_sub(used_threads);
            if free_cores < action.min_cores() || ram < action.ram() {
                return None;
            }
            let reserved = action.max_cores().min(free_cores).max(action.min_cores());
            Some((h, reserved, free_cores - reserved))
        })
        .min_by_key(|(_, _, remaining)| *remaining)
        .map(|(h, reserved, _)| (h, reserved))
}

#[cfg(test)]
#[path = "action_scheduler_tests.rs"]
mod tests;
