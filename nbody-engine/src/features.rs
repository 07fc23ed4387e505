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
//! Tick-scoped effect accumulators
//!
//! Arbitrary laws do not touch the particle collection directly. They report
//! effects keyed by feature name, the engine routes each effect into the
//! matching [`Feature`], and every feature is applied exactly once per tick,
//! after the pairwise scan. While the scan runs, a feature's accumulated
//! state only grows, so laws can consult it (for example "is this particle
//! already scheduled for removal?") and get a consistent answer.

use crate::error::{Error, Result};
use crate::particle::{Particle, ParticleId, ParticleSet};
use std::any::Any;
use std::collections::{HashMap, HashSet};

/// Name of the built-in removal feature
pub const REMOVE_FEATURE: &str = "remove";

/// Name of the built-in spawn feature
pub const SPAWN_FEATURE: &str = "spawn";

/// Effect payload reported by an arbitrary law
#[derive(Debug, Clone)]
pub enum Effect {
    /// Particles to delete at the end of the tick
    Remove(HashSet<ParticleId>),
    /// Particles to add at the end of the tick
    Spawn(Vec<Particle>),
}

impl Effect {
    /// Short name of the payload kind
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::Remove(_) => "remove",
            Effect::Spawn(_) => "spawn",
        }
    }
}

/// Effects reported by one law evaluation, keyed by feature name
pub type Effects = HashMap<String, Effect>;

/// A named accumulator applied once per tick
pub trait Feature: Send {
    /// Name effects are routed by; unique within a [`FeatureMap`]
    fn name(&self) -> &str;

    /// Merge an effect payload into the accumulator
    ///
    /// # Errors
    ///
    /// Returns `FeatureMismatch` for a payload kind the feature cannot consume.
    fn update(&mut self, effect: Effect) -> Result<()>;

    /// Apply the accumulated effects to the particle collection and reset
    fn apply(&mut self, particles: &mut ParticleSet) -> Result<()>;

    /// Allow downcasting to concrete feature types
    fn as_any(&self) -> &dyn Any;
}

/// Accumulates particles marked for deletion and removes them at tick end
#[derive(Debug, Default)]
pub struct RemoveFeature {
    particles_to_remove: HashSet<ParticleId>,
}

impl RemoveFeature {
    /// Create an empty removal feature
    pub fn new() -> Self {
        RemoveFeature::default()
    }

    /// Check if a particle is already scheduled for removal this tick
    pub fn is_scheduled(&self, id: ParticleId) -> bool {
        self.particles_to_remove.contains(&id)
    }

    /// Number of particles scheduled for removal
    pub fn pending_count(&self) -> usize {
        self.particles_to_remove.len()
    }
}

impl Feature for RemoveFeature {
    fn name(&self) -> &str {
        REMOVE_FEATURE
    }

    fn update(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::Remove(ids) => {
                self.particles_to_remove.extend(ids);
                Ok(())
            }
            other => Err(Error::FeatureMismatch {
                feature: REMOVE_FEATURE.to_string(),
                effect: other.kind(),
            }),
        }
    }

    fn apply(&mut self, particles: &mut ParticleSet) -> Result<()> {
        let removed = particles.remove_all(&self.particles_to_remove);
        if removed > 0 {
            log::debug!("removed {} particle(s)", removed);
        }
        self.particles_to_remove.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accumulates new particles and inserts them at tick end
#[derive(Debug, Default)]
pub struct SpawnFeature {
    particles_to_add: Vec<Particle>,
}

impl SpawnFeature {
    /// Create an empty spawn feature
    pub fn new() -> Self {
        SpawnFeature::default()
    }

    /// Number of particles waiting to be added
    pub fn pending_count(&self) -> usize {
        self.particles_to_add.len()
    }
}

impl Feature for SpawnFeature {
    fn name(&self) -> &str {
        SPAWN_FEATURE
    }

    fn update(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::Spawn(new_particles) => {
                self.particles_to_add.extend(new_particles);
                Ok(())
            }
            other => Err(Error::FeatureMismatch {
                feature: SPAWN_FEATURE.to_string(),
                effect: other.kind(),
            }),
        }
    }

    fn apply(&mut self, particles: &mut ParticleSet) -> Result<()> {
        particles.extend(self.particles_to_add.drain(..));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Features owned by the engine, applied in registration order
pub struct FeatureMap {
    features: Vec<Box<dyn Feature>>,
}

impl FeatureMap {
    /// Create an empty feature map
    pub fn new() -> Self {
        FeatureMap {
            features: Vec::new(),
        }
    }

    /// Create a feature map holding the built-in removal and spawn features
    pub fn with_builtins() -> Self {
        FeatureMap {
            features: vec![Box::new(RemoveFeature::new()), Box::new(SpawnFeature::new())],
        }
    }

    /// Register a feature
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a feature with the same name exists.
    pub fn register(&mut self, feature: Box<dyn Feature>) -> Result<()> {
        if self.contains(feature.name()) {
            return Err(Error::InvalidConfig(format!(
                "feature '{}' is already registered",
                feature.name()
            )));
        }
        self.features.push(feature);
        Ok(())
    }

    /// Check if a feature is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name() == name)
    }

    /// Get a feature by name, downcast to its concrete type
    pub fn get<T: Feature + 'static>(&self, name: &str) -> Option<&T> {
        self.features
            .iter()
            .find(|f| f.name() == name)
            .and_then(|f| f.as_any().downcast_ref::<T>())
    }

    /// Names of all registered features in application order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Get the number of registered features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if no features are registered
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Route every effect to the feature of the same name
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeature` for an unregistered name, or the feature's
    /// own error if it rejects the payload.
    pub fn route(&mut self, effects: Effects) -> Result<()> {
        for (name, effect) in effects {
            let feature = self
                .features
                .iter_mut()
                .find(|f| f.name() == name)
                .ok_or_else(|| Error::UnknownFeature(name.clone()))?;
            feature.update(effect)?;
        }
        Ok(())
    }

    /// Apply every feature once, in registration order
    pub fn apply_all(&mut self, particles: &mut ParticleSet) -> Result<()> {
        for feature in &mut self.features {
            feature.apply(particles)?;
        }
        Ok(())
    }
}

impl Default for FeatureMap {
    fn default() -> Self {
        Self::with_builtins()
    }
}
