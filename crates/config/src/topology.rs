// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML host/link/disk topology loader for example simulators. Layers merge
//! with local-wins-over-import semantics: an earlier layer's host or disk
//! keeps its definition on a name collision with a later one, which is
//! recorded as a warning rather than an error.
//!
//! Links are loaded and kept on [`Topology`] for a driver to log or reason
//! about, but are not applied to [`wrench_engine::HostCatalog`] /
//! [`wrench_engine::DiskCatalog`]: the engine substrate deliberately stops
//! short of a link-routing network simulator, so link entries are accepted
//! without affecting simulated timing.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use wrench_core::HostId;
use wrench_engine::{DiskCatalog, HostCatalog};

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read topology file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to parse topology file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("disk entry references unknown host {host:?}")]
    UnknownHost { host: String },
    #[error("link entry references unknown host {host:?}")]
    UnknownLinkHost { host: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostSpec {
    pub cores: u32,
    pub ram: f64,
    pub flop_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskSpec {
    pub host: String,
    pub read_bandwidth: f64,
    pub write_bandwidth: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSpec {
    pub src: String,
    pub dst: String,
    pub bandwidth: f64,
    #[serde(default)]
    pub latency: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawTopology {
    #[serde(default)]
    hosts: HashMap<String, HostSpec>,
    #[serde(default)]
    disks: HashMap<String, DiskSpec>,
    #[serde(default)]
    links: Vec<LinkSpec>,
}

/// A parsed, name-keyed platform description: disjoint from any
/// `HostId`/`HostCatalog` until [`Topology::install`] assigns fresh IDs.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    hosts: HashMap<String, HostSpec>,
    disks: HashMap<String, DiskSpec>,
    links: Vec<LinkSpec>,
}

impl Topology {
    pub fn from_str(text: &str) -> Result<Self, toml::de::Error> {
        let raw: RawTopology = toml::from_str(text)?;
        Ok(Self { hosts: raw.hosts, disks: raw.disks, links: raw.links })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TopologyError::Read { path: path.display().to_string(), source })?;
        Self::from_str(&text).map_err(|source| TopologyError::Parse { path: path.display().to_string(), source })
    }

    /// Load and merge several topology layers in order, host-by-host and
    /// disk-by-disk: the earliest layer to define a given name wins on a
    /// collision with a later one. Returns the merged topology plus one
    /// warning per name a later layer tried and failed to override.
    pub fn load_layered(paths: &[impl AsRef<Path>]) -> Result<(Self, Vec<String>), TopologyError> {
        let mut merged = Topology::default();
        let mut warnings = Vec::new();
        for path in paths {
            let layer = Self::load(path)?;
            merged.merge(layer, path.as_ref().display().to_string(), &mut warnings);
        }
        Ok((merged, warnings))
    }

    fn merge(&mut self, other: Topology, layer_name: String, warnings: &mut Vec<String>) {
        for (name, spec) in other.hosts {
            match self.hosts.entry(name) {
                std::collections::hash_map::Entry::Occupied(e) => {
                    warnings.push(format!("host {:?} from layer {layer_name:?} ignored: already defined by an earlier layer", e.key()));
                }
                std::collections::hash_map::Entry::Vacant(e) => {
                    e.insert(spec);
                }
            }
        }
        for (name, spec) in other.disks {
            match self.disks.entry(name) {
                std::collections::hash_map::Entry::Occupied(e) => {
                    warnings.push(format!("disk {:?} from layer {layer_name:?} ignored: already defined by an earlier layer", e.key()));
                }
                std::collections::hash_map::Entry::Vacant(e) => {
                    e.insert(spec);
                }
            }
        }
        self.links.extend(other.links);
    }

    pub fn hosts(&self) -> &HashMap<String, HostSpec> {
        &self.hosts
    }

    pub fn links(&self) -> &[LinkSpec] {
        &self.links
    }

    /// Register every host and disk into fresh catalogs, returning the
    /// name-to-`HostId` assignment a driver needs to address hosts named in
    /// its own scenario code.
    pub fn install(&self) -> Result<(HostCatalog, DiskCatalog, HashMap<String, HostId>), TopologyError> {
        let mut host_catalog = HostCatalog::new();
        let mut disk_catalog = DiskCatalog::new();
        let mut ids = HashMap::new();
        for (name, spec) in &self.hosts {
            let id = HostId::new();
            host_catalog.register_host(id, spec.cores, spec.ram, spec.flop_rate);
            ids.insert(name.clone(), id);
        }
        for spec in self.disks.values() {
            let host_id = *ids.get(&spec.host).ok_or_else(|| TopologyError::UnknownHost { host: spec.host.clone() })?;
            disk_catalog.register_disk(host_id, spec.read_bandwidth, spec.write_bandwidth);
        }
        for link in &self.links {
            if !ids.contains_key(&link.src) {
                return Err(TopologyError::UnknownLinkHost { host: link.src.clone() });
            }
            if !ids.contains_key(&link.dst) {
                return Err(TopologyError::UnknownLinkHost { host: link.dst.clone() });
            }
        }
        Ok((host_catalog, disk_catalog, ids))
    }
}

#[cfg(test)]
#[path = "topology_tests.rs"]
mod tests;
