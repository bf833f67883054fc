// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service-specific-argument validation, named property maps, and TOML
//! topology loading (spec §6), kept free of any particular service's
//! runtime state so `wrench-services`, `wrench-xrootd`, and `wrench-cli` can
//! each depend on it without a cycle.

pub mod properties;
pub mod service_args;
pub mod topology;

pub use properties::{PropertyError, PropertyMap};
pub use topology::{DiskSpec, HostSpec, LinkSpec, Topology, TopologyError};
