// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Engine configuration
//!
//! Configuration is a plain struct with defaults and builder-style setters.
//! [`EngineConfig::from_env`] overlays environment variables on the
//! defaults:
//!
//! ```bash
//! export NBODY_PARTICLE_COUNT=200   # particles created at startup
//! export NBODY_WORKERS=8            # 0 runs sequentially
//! export NBODY_MAX_TICKS=500        # unset runs until stopped
//! export NBODY_SEED=42              # unset seeds from entropy
//! ```

use crate::error::{Error, Result};
use std::str::FromStr;

/// Environment variable for the particle count
pub const ENV_PARTICLE_COUNT: &str = "NBODY_PARTICLE_COUNT";
/// Environment variable for the worker count
pub const ENV_WORKERS: &str = "NBODY_WORKERS";
/// Environment variable for the tick cap
pub const ENV_MAX_TICKS: &str = "NBODY_MAX_TICKS";
/// Environment variable for the RNG seed
pub const ENV_SEED: &str = "NBODY_SEED";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of particles created at initialization
    pub particle_count: usize,
    /// Worker threads for the parallel run (0 selects the sequential run)
    pub workers: usize,
    /// Stop after this many ticks (None runs until a stop is requested)
    pub max_ticks: Option<u64>,
    /// Seed for the default particle factory (None seeds from entropy)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            particle_count: 100,
            workers: 0,
            max_ticks: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration for `particle_count` particles
    pub fn new(particle_count: usize) -> Self {
        EngineConfig {
            particle_count,
            ..Default::default()
        }
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the tick cap
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a configuration from the environment
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the variable if a value does not parse
    /// or the resulting configuration is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// [`from_env`](Self::from_env) uses the process environment; tests pass
    /// a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(count) = parse_var::<usize, _>(&lookup, ENV_PARTICLE_COUNT)? {
            config.particle_count = count;
        }
        if let Some(workers) = parse_var::<usize, _>(&lookup, ENV_WORKERS)? {
            config.workers = workers;
        }
        config.max_ticks = parse_var::<u64, _>(&lookup, ENV_MAX_TICKS)?;
        config.seed = parse_var::<u64, _>(&lookup, ENV_SEED)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the particle count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::InvalidConfig(
                "particle count must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if this configuration selects the parallel run
    pub fn is_parallel(&self) -> bool {
        self.workers > 0
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::InvalidConfig(format!("{}='{}' is not valid: {}", key, raw, e))
        }),
    }
}
