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
//! Pluggable pairwise interaction laws
//!
//! Two kinds of strategy drive a tick:
//!
//! - **Force generators** compute a force vector between two particles.
//!   Every generator's output for a pair is summed into one combined force,
//!   which is then applied with an equal and opposite reaction.
//! - **Arbitrary laws** produce non-force effects (merging, removal,
//!   spawning). They may stage writes on the two particles of the pair and
//!   report effects keyed by feature name.
//!
//! Both are stateless from tick to tick. Any cross-pair state, such as
//! "this particle was already absorbed this tick", lives in the engine's
//! features and is visible to laws through [`LawContext`].
//!
//! # Writing a force generator
//!
//! ```rust
//! use nbody_engine::laws::ForceGenerator;
//! use nbody_engine::particle::Particle;
//! use nbody_engine::Result;
//!
//! /// Constant push along the first axis, from `particle` toward `other`
//! struct Wind {
//!     strength: f64,
//! }
//!
//! impl ForceGenerator for Wind {
//!     fn name(&self) -> &str {
//!         "wind"
//!     }
//!
//!     fn compute_force(&self, particle: &Particle, _other: &Particle) -> Result<Vec<f64>> {
//!         let mut force = vec![0.0; particle.dimensions()];
//!         force[0] = self.strength;
//!         Ok(force)
//!     }
//! }
//! ```

mod gravity;
mod merge;

pub use gravity::{Gravity, SingularityPolicy, DEFAULT_GRAVITATIONAL_CONSTANT};
pub use merge::{Merge, MINIMUM_MERGE_DISTANCE};

use crate::error::{Error, Result};
use crate::features::{Effects, FeatureMap, RemoveFeature, REMOVE_FEATURE};
use crate::particle::{Particle, ParticleId};

/// Pairwise force strategy
pub trait ForceGenerator: Send + Sync {
    /// Descriptive name for logging
    fn name(&self) -> &str;

    /// Force exerted by `particle` on `other`
    ///
    /// Must be a pure function of the two particles' state and return a
    /// vector with the particles' dimensionality.
    fn compute_force(&self, particle: &Particle, other: &Particle) -> Result<Vec<f64>>;
}

/// Pairwise non-force strategy
pub trait ArbitraryLaw: Send + Sync {
    /// Descriptive name for logging
    fn name(&self) -> &str;

    /// Evaluate the law for one ordered pair
    ///
    /// Implementations may stage writes on either particle. Effects are
    /// returned keyed by feature name and routed by the engine.
    fn apply(
        &self,
        particle: &mut Particle,
        other: &mut Particle,
        context: &LawContext<'_>,
    ) -> Result<Effects>;
}

/// Read-only view of engine state handed to arbitrary laws
pub struct LawContext<'a> {
    features: &'a FeatureMap,
    tick: u64,
}

impl<'a> LawContext<'a> {
    /// Create a new law context
    ///
    /// This is only callable by the engine.
    pub(crate) fn new(features: &'a FeatureMap, tick: u64) -> Self {
        LawContext { features, tick }
    }

    /// Features accumulated so far this tick
    pub fn features(&self) -> &FeatureMap {
        self.features
    }

    /// Index of the tick being evaluated
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Check if a particle is already scheduled for removal this tick
    pub fn is_scheduled_for_removal(&self, id: ParticleId) -> bool {
        self.features
            .get::<RemoveFeature>(REMOVE_FEATURE)
            .map(|feature| feature.is_scheduled(id))
            .unwrap_or(false)
    }
}

/// Sum the forces of every generator for one ordered pair
///
/// Returns `None` when no generator is registered.
pub fn combined_force(
    generators: &[Box<dyn ForceGenerator>],
    particle: &Particle,
    other: &Particle,
) -> Result<Option<Vec<f64>>> {
    let mut total: Option<Vec<f64>> = None;
    for generator in generators {
        let force = generator.compute_force(particle, other)?;
        total = Some(match total.take() {
            None => force,
            Some(mut sum) => {
                if force.len() != sum.len() {
                    return Err(Error::DimensionMismatch {
                        expected: sum.len(),
                        found: force.len(),
                    });
                }
                for (s, f) in sum.iter_mut().zip(&force) {
                    *s += f;
                }
                sum
            }
        });
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(Vec<f64>);

    impl ForceGenerator for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn compute_force(&self, _particle: &Particle, _other: &Particle) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    fn pair() -> (Particle, Particle) {
        (
            Particle::new(1.0, vec![0.0, 0.0], vec![0.0, 0.0]).unwrap(),
            Particle::new(1.0, vec![1.0, 0.0], vec![0.0, 0.0]).unwrap(),
        )
    }

    #[test]
    fn test_combined_force_sums_each_generator_once() {
        let (a, b) = pair();
        let generators: Vec<Box<dyn ForceGenerator>> = vec![
            Box::new(Constant(vec![1.0, 2.0])),
            Box::new(Constant(vec![0.5, -1.0])),
        ];
        let total = combined_force(&generators, &a, &b).unwrap();
        assert_eq!(total, Some(vec![1.5, 1.0]));
    }

    #[test]
    fn test_combined_force_without_generators() {
        let (a, b) = pair();
        assert_eq!(combined_force(&[], &a, &b).unwrap(), None);
    }

    #[test]
    fn test_combined_force_dimension_mismatch() {
        let (a, b) = pair();
        let generators: Vec<Box<dyn ForceGenerator>> = vec![
            Box::new(Constant(vec![1.0, 2.0])),
            Box::new(Constant(vec![1.0])),
        ];
        assert!(combined_force(&generators, &a, &b).is_err());
    }

    #[test]
    fn test_context_reports_scheduled_removals() {
        use crate::features::Effect;

        let (a, b) = pair();
        let mut features = FeatureMap::with_builtins();
        let mut effects = Effects::new();
        effects.insert(
            REMOVE_FEATURE.to_string(),
            Effect::Remove([a.id()].into_iter().collect()),
        );
        features.route(effects).unwrap();

        let context = LawContext::new(&features, 7);
        assert_eq!(context.tick(), 7);
        assert!(context.is_scheduled_for_removal(a.id()));
        assert!(!context.is_scheduled_for_removal(b.id()));
    }

    #[test]
    fn test_context_without_remove_feature() {
        let (a, _) = pair();
        let features = FeatureMap::new();
        let context = LawContext::new(&features, 0);
        assert!(!context.is_scheduled_for_removal(a.id()));
    }
}
