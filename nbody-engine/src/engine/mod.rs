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
//! Simulation engine and tick loop
//!
//! The engine owns the particle collection, the ordered force generators,
//! the ordered arbitrary laws, and the feature map. One tick is:
//!
//! 1. For every ordered pair of distinct particles: evaluate every law
//!    (routing its effects into features), sum every force generator, and
//!    apply the combined force immediately.
//! 2. Apply every feature once (removals, spawns).
//! 3. Integrate and commit every remaining particle.
//!
//! Positions and masses read during step 1 are the committed values from the
//! previous tick, so the result does not depend on visiting order beyond
//! floating-point rounding. After each tick the [`TickHook`] runs.
//!
//! # Parallel run
//!
//! [`Engine::run_parallel`] keeps step 1's laws on the coordinating thread
//! and distributes only force accumulation across a [`WorkerPool`]. Laws
//! see the same committed snapshot they would see in the sequential run,
//! and whatever they stage travels with the particles into the workers.

mod config;
mod factory;
mod hook;

pub use config::{EngineConfig, ENV_MAX_TICKS, ENV_PARTICLE_COUNT, ENV_SEED, ENV_WORKERS};
pub use factory::{Generator, ParticleFactory};
pub use hook::{HookContext, LoggingHook, NoopHook, StopHandle, TickHook};

use crate::error::{Error, Result};
use crate::features::{Feature, FeatureMap};
use crate::laws::{combined_force, ArbitraryLaw, ForceGenerator, LawContext};
use crate::parallel::WorkerPool;
use crate::particle::{Particle, ParticleSet};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// N-body simulation engine
///
/// # Example
///
/// ```rust
/// use nbody_engine::engine::{Engine, EngineConfig};
/// use nbody_engine::laws::Gravity;
/// use nbody_engine::particle::Particle;
///
/// let mut engine = Engine::builder()
///     .config(EngineConfig::default().with_max_ticks(10))
///     .particles(vec![
///         Particle::new(10.0, vec![0.0, 0.0], vec![0.0, 0.0]).unwrap(),
///         Particle::new(100.0, vec![40.0, 0.0], vec![0.0, 0.0]).unwrap(),
///     ])
///     .force_generator(Gravity::default())
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.run().unwrap(), 10);
/// ```
pub struct Engine {
    particles: ParticleSet,
    force_generators: Arc<Vec<Box<dyn ForceGenerator>>>,
    arbitrary_laws: Vec<Box<dyn ArbitraryLaw>>,
    features: FeatureMap,
    hook: Box<dyn TickHook>,
    stop: StopHandle,
    max_ticks: Option<u64>,
    ticks: u64,
}

impl Engine {
    /// Create an engine from a particle count and strategy lists
    ///
    /// `factory` defaults to the random layout seeded by `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration, or the
    /// factory's error if it generates an invalid particle.
    pub fn new(
        config: EngineConfig,
        factory: Option<ParticleFactory>,
        force_generators: Vec<Box<dyn ForceGenerator>>,
        arbitrary_laws: Vec<Box<dyn ArbitraryLaw>>,
    ) -> Result<Self> {
        let mut builder = Engine::builder().config(config);
        if let Some(factory) = factory {
            builder = builder.factory(factory);
        }
        builder.force_generators = force_generators;
        builder.arbitrary_laws = arbitrary_laws;
        builder.build()
    }

    /// Start building an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Current particle collection
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// Registered features
    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    /// Number of registered force generators
    pub fn force_generator_count(&self) -> usize {
        self.force_generators.len()
    }

    /// Number of registered arbitrary laws
    pub fn law_count(&self) -> usize {
        self.arbitrary_laws.len()
    }

    /// Ticks completed over the engine's lifetime
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Handle that stops a run at the next tick boundary
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request the running loop to stop at the next tick boundary
    pub fn quit(&self) {
        self.stop.stop();
    }

    /// Replace the tick hook
    pub fn set_hook<H: TickHook + 'static>(&mut self, hook: H) {
        self.hook = Box::new(hook);
    }

    /// Highest dimensionality among the particles (0 when empty)
    pub fn dimensions(&self) -> usize {
        self.particles.iter().map(Particle::dimensions).max().unwrap_or(0)
    }

    /// Sum of committed masses
    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(Particle::mass).sum()
    }

    /// Total momentum per dimension
    pub fn momentum(&self) -> Vec<f64> {
        let mut momentum = vec![0.0; self.dimensions()];
        for particle in self.particles.iter() {
            for (m, v) in momentum.iter_mut().zip(particle.velocity()) {
                *m += particle.mass() * v;
            }
        }
        momentum
    }

    /// Total kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Advance the simulation by one sequential tick
    ///
    /// # Errors
    ///
    /// Any law, force, or feature error aborts the tick. The collection is
    /// left mid-tick and should not be advanced further.
    pub fn tick(&mut self) -> Result<()> {
        self.scan_pairs(true)?;
        self.features.apply_all(&mut self.particles)?;
        self.integrate_and_commit();
        self.ticks += 1;
        Ok(())
    }

    /// Advance the simulation by one tick using a worker pool
    ///
    /// Laws run sequentially on the calling thread, forces are accumulated
    /// by the workers, then features are applied to the gathered collection.
    ///
    /// # Errors
    ///
    /// Any law or feature error, or the first worker error, aborts the tick.
    pub fn tick_parallel(&mut self, pool: &WorkerPool) -> Result<()> {
        if !self.arbitrary_laws.is_empty() {
            self.scan_pairs(false)?;
        }

        let updated = pool.dispatch(self.ticks, self.particles.as_slice())?;
        self.particles = updated.into_iter().collect();

        self.features.apply_all(&mut self.particles)?;
        self.ticks += 1;
        Ok(())
    }

    /// Run sequential ticks until stopped
    ///
    /// Returns the number of ticks completed by this call.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing tick.
    pub fn run(&mut self) -> Result<u64> {
        log::info!(
            "sequential run: {} particle(s), {} force generator(s), {} law(s)",
            self.particles.len(),
            self.force_generators.len(),
            self.arbitrary_laws.len()
        );

        let mut completed = 0;
        while self.should_continue(completed) {
            self.tick()?;
            completed += 1;
            self.run_hook();
        }

        log::info!("sequential run stopped after {} tick(s)", completed);
        Ok(completed)
    }

    /// Run parallel ticks on a pool of `workers` threads until stopped
    ///
    /// The pool is created before the first tick and torn down when the run
    /// ends. Returns the number of ticks completed by this call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `workers` is zero, or the error of the
    /// first failing tick.
    pub fn run_parallel(&mut self, workers: usize) -> Result<u64> {
        let pool = WorkerPool::new(workers, Arc::clone(&self.force_generators))?;
        log::info!(
            "parallel run on {} worker(s): {} particle(s), {} law(s)",
            pool.size(),
            self.particles.len(),
            self.arbitrary_laws.len()
        );

        let mut completed = 0;
        while self.should_continue(completed) {
            self.tick_parallel(&pool)?;
            completed += 1;
            self.run_hook();
        }

        log::info!("parallel run stopped after {} tick(s)", completed);
        Ok(completed)
    }

    fn should_continue(&self, completed: u64) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        match self.max_ticks {
            Some(max) => completed < max,
            None => true,
        }
    }

    fn run_hook(&mut self) {
        log::debug!(
            "tick {} done: {} particle(s)",
            self.ticks,
            self.particles.len()
        );
        let context = HookContext::new(self.ticks, &self.particles, &self.stop);
        self.hook.after_tick(&context);
    }

    /// Visit every ordered pair of distinct particles
    fn scan_pairs(&mut self, with_forces: bool) -> Result<()> {
        let count = self.particles.len();
        for i in 0..count {
            for j in 0..count {
                if i == j {
                    continue;
                }
                let (particle, other) = self.particles.pair_mut(i, j);

                for law in &self.arbitrary_laws {
                    let effects = {
                        let context = LawContext::new(&self.features, self.ticks);
                        law.apply(particle, other, &context)?
                    };
                    if !effects.is_empty() {
                        self.features.route(effects)?;
                    }
                }

                if with_forces {
                    if let Some(force) = combined_force(&self.force_generators, particle, other)? {
                        particle.apply_force(&force, other)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn integrate_and_commit(&mut self) {
        #[cfg(feature = "parallel")]
        {
            self.particles.as_mut_slice().par_iter_mut().for_each(|particle| {
                particle.integrate();
                particle.commit();
            });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for particle in self.particles.iter_mut() {
                particle.integrate();
                particle.commit();
            }
        }
    }
}

/// Builder for [`Engine`]
pub struct EngineBuilder {
    config: EngineConfig,
    factory: Option<ParticleFactory>,
    particles: Option<Vec<Particle>>,
    force_generators: Vec<Box<dyn ForceGenerator>>,
    arbitrary_laws: Vec<Box<dyn ArbitraryLaw>>,
    extra_features: Vec<Box<dyn Feature>>,
    hook: Box<dyn TickHook>,
}

impl EngineBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        EngineBuilder {
            config: EngineConfig::default(),
            factory: None,
            particles: None,
            force_generators: Vec::new(),
            arbitrary_laws: Vec::new(),
            extra_features: Vec::new(),
            hook: Box::new(NoopHook),
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate `config.particle_count` particles with this factory
    pub fn factory(mut self, factory: ParticleFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Start from these particles instead of a factory
    pub fn particles(mut self, particles: Vec<Particle>) -> Self {
        self.particles = Some(particles);
        self
    }

    /// Append a force generator
    pub fn force_generator<G: ForceGenerator + 'static>(mut self, generator: G) -> Self {
        self.force_generators.push(Box::new(generator));
        self
    }

    /// Append an arbitrary law
    pub fn law<L: ArbitraryLaw + 'static>(mut self, law: L) -> Self {
        self.arbitrary_laws.push(Box::new(law));
        self
    }

    /// Register a feature alongside the built-in ones
    pub fn feature<F: Feature + 'static>(mut self, feature: F) -> Self {
        self.extra_features.push(Box::new(feature));
        self
    }

    /// Set the tick hook
    pub fn hook<H: TickHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Build the engine and create its initial particles
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty or duplicated particle list, an
    /// invalid configuration, or a duplicate feature name.
    pub fn build(self) -> Result<Engine> {
        let particles = match self.particles {
            Some(particles) => {
                if particles.is_empty() {
                    return Err(Error::InvalidConfig(
                        "particle list must not be empty".to_string(),
                    ));
                }
                let count = particles.len();
                let set: ParticleSet = particles.into_iter().collect();
                if set.len() != count {
                    return Err(Error::InvalidConfig(
                        "particle list contains the same particle twice".to_string(),
                    ));
                }
                set
            }
            None => {
                self.config.validate()?;
                let mut factory = self
                    .factory
                    .unwrap_or_else(|| ParticleFactory::new(self.config.seed));
                factory.build(self.config.particle_count)?
            }
        };

        let mut features = FeatureMap::with_builtins();
        for feature in self.extra_features {
            features.register(feature)?;
        }

        Ok(Engine {
            particles,
            force_generators: Arc::new(self.force_generators),
            arbitrary_laws: self.arbitrary_laws,
            features,
            hook: self.hook,
            stop: StopHandle::new(),
            max_ticks: self.config.max_ticks,
            ticks: 0,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
