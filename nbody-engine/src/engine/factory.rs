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
//! Initial particle state
//!
//! A [`ParticleFactory`] turns a particle count into an initial
//! [`ParticleSet`] by calling one generator per attribute with the particle's
//! index. Generators receive the factory's RNG so random and deterministic
//! layouts share one interface.
//!
//! The default layout scatters 3-D particles at rest, with masses uniform in
//! [10, 100) and positions uniform in [-1000, 1000] × [-500, 500] ×
//! [-500, 500].

use crate::error::{Error, Result};
use crate::particle::{Particle, ParticleSet};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Per-index generator for one attribute
pub type Generator<T> = Box<dyn FnMut(usize, &mut StdRng) -> T + Send>;

/// Builds the engine's initial particles
pub struct ParticleFactory {
    rng: StdRng,
    mass: Generator<f64>,
    position: Generator<Vec<f64>>,
    velocity: Generator<Vec<f64>>,
}

impl ParticleFactory {
    /// Create a factory with the default random layout
    ///
    /// `seed` makes the layout reproducible; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        ParticleFactory {
            rng,
            mass: Box::new(|_: usize, rng: &mut StdRng| rng.random_range(10.0..100.0)),
            position: Box::new(|_: usize, rng: &mut StdRng| {
                vec![
                    rng.random_range(-1000.0..1000.0),
                    rng.random_range(-500.0..500.0),
                    rng.random_range(-500.0..500.0),
                ]
            }),
            velocity: Box::new(|_: usize, _: &mut StdRng| vec![0.0, 0.0, 0.0]),
        }
    }

    /// Replace the mass generator
    pub fn with_mass<F>(mut self, generator: F) -> Self
    where
        F: FnMut(usize, &mut StdRng) -> f64 + Send + 'static,
    {
        self.mass = Box::new(generator);
        self
    }

    /// Replace the position generator
    pub fn with_position<F>(mut self, generator: F) -> Self
    where
        F: FnMut(usize, &mut StdRng) -> Vec<f64> + Send + 'static,
    {
        self.position = Box::new(generator);
        self
    }

    /// Replace the velocity generator
    pub fn with_velocity<F>(mut self, generator: F) -> Self
    where
        F: FnMut(usize, &mut StdRng) -> Vec<f64> + Send + 'static,
    {
        self.velocity = Box::new(generator);
        self
    }

    /// Create `count` particles
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero count, or the particle
    /// constructor's error for a generated state that violates its
    /// invariants.
    pub fn build(&mut self, count: usize) -> Result<ParticleSet> {
        if count == 0 {
            return Err(Error::InvalidConfig(
                "particle count must be > 0".to_string(),
            ));
        }

        let mut particles = ParticleSet::with_capacity(count);
        for i in 0..count {
            let mass = (self.mass)(i, &mut self.rng);
            let position = (self.position)(i, &mut self.rng);
            let velocity = (self.velocity)(i, &mut self.rng);
            particles.insert(Particle::new(mass, position, velocity)?);
        }
        Ok(particles)
    }
}

impl Default for ParticleFactory {
    fn default() -> Self {
        Self::new(None)
    }
}
