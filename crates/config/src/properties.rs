// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named, string-typed property maps for storage services and schedulers,
//! with typed accessors and documented defaults.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Recognized storage-service property names (spec §6 "Storage-service
/// properties").
pub const CACHE_MAX_LIFETIME: &str = "CACHE_MAX_LIFETIME";
pub const REDUCED_SIMULATION: &str = "REDUCED_SIMULATION";
pub const BUFFER_SIZE: &str = "BUFFER_SIZE";
pub const MESSAGE_OVERHEAD: &str = "MESSAGE_OVERHEAD";
pub const CACHE_LOOKUP_OVERHEAD: &str = "CACHE_LOOKUP_OVERHEAD";
pub const SEARCH_BROADCAST_OVERHEAD: &str = "SEARCH_BROADCAST_OVERHEAD";
pub const UPDATE_CACHE_OVERHEAD: &str = "UPDATE_CACHE_OVERHEAD";
pub const LOOKUP_OVERHEAD: &str = "LOOKUP_OVERHEAD";

/// Recognized scheduler property names (spec §6 "Scheduler properties").
pub const TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN: &str = "TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN";
pub const RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH: &str = "RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH";
pub const THREAD_STARTUP_OVERHEAD: &str = "THREAD_STARTUP_OVERHEAD";

const STORAGE_PROPERTIES: &[&str] =
    &[CACHE_MAX_LIFETIME, REDUCED_SIMULATION, BUFFER_SIZE, MESSAGE_OVERHEAD, CACHE_LOOKUP_OVERHEAD, SEARCH_BROADCAST_OVERHEAD, UPDATE_CACHE_OVERHEAD, LOOKUP_OVERHEAD];

const SCHEDULER_PROPERTIES: &[&str] = &[TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN, RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH, THREAD_STARTUP_OVERHEAD];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error("unrecognized property {0:?}")]
    Unrecognized(String),
    #[error("property {key:?} has value {value:?}, which is not a valid {expected}")]
    InvalidValue { key: String, value: String, expected: &'static str },
}

/// A string-typed property map scoped to one kind of component (storage
/// service or scheduler), rejecting unrecognized keys at insertion time
/// rather than silently ignoring them.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    recognized: &'static [&'static str],
    values: HashMap<String, String>,
}

impl PropertyMap {
    pub fn storage_service() -> Self {
        Self { recognized: STORAGE_PROPERTIES, values: HashMap::new() }
    }

    pub fn scheduler() -> Self {
        Self { recognized: SCHEDULER_PROPERTIES, values: HashMap::new() }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), PropertyError> {
        let key = key.into();
        if !self.recognized.contains(&key.as_str()) {
            return Err(PropertyError::Unrecognized(key));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn as_bool(&self, key: &str, default: bool) -> Result<bool, PropertyError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<bool>().map_err(|_| PropertyError::InvalidValue { key: key.to_string(), value: raw.to_string(), expected: "bool" }),
        }
    }

    pub fn as_f64(&self, key: &str, default: f64) -> Result<f64, PropertyError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<f64>().map_err(|_| PropertyError::InvalidValue { key: key.to_string(), value: raw.to_string(), expected: "f64" }),
        }
    }

    pub fn as_duration(&self, key: &str, default: Duration) -> Result<Duration, PropertyError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => {
                let secs = raw.parse::<f64>().map_err(|_| PropertyError::InvalidValue { key: key.to_string(), value: raw.to_string(), expected: "seconds" })?;
                Ok(Duration::from_secs_f64(secs.max(0.0)))
            }
        }
    }

    pub fn as_bytes(&self, key: &str, default: u64) -> Result<u64, PropertyError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<u64>().map_err(|_| PropertyError::InvalidValue { key: key.to_string(), value: raw.to_string(), expected: "bytes" }),
        }
    }
}

#[cfg(test)]
#[path = "properties_tests.rs"]
mod tests;
